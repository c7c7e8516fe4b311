//! Type Conversions for GenerationError
//!
//! From implementations for the error types adapters run into most.

use super::types::GenerationError;
use crate::types::ProviderId;

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Map a transport failure onto the provider that was being called.
pub(crate) fn transport_error(provider: ProviderId, err: reqwest::Error) -> GenerationError {
    if err.is_decode() {
        return GenerationError::Parse(format!("{provider}: {err}"));
    }
    if let Some(status) = err.status() {
        return super::types::classify_http_status(provider, status.as_u16(), &err.to_string());
    }
    GenerationError::unavailable(provider, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: GenerationError = json_err.into();
        assert!(matches!(err, GenerationError::Parse(_)));
    }
}
