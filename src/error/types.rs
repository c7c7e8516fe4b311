//! Core error types.

use thiserror::Error;

use crate::types::ProviderId;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Errors surfaced by the orchestrator and provider adapters.
///
/// Each variant is a stable kind the caller can act on differently: fix the
/// request, fix credentials, or retry later. Provider-reported task failures
/// and poll timeouts are *not* errors; they come back as a failed
/// [`GenerationResult`](crate::types::GenerationResult).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GenerationError {
    /// Local pre-flight check failed; no network call was made.
    #[error("validation error: {0}")]
    Validation(String),

    /// The request named a model id that is not in the catalog.
    #[error("unknown model: {0}")]
    UnknownModel(String),

    /// The provider rejected the API key.
    #[error("invalid credentials for {provider}: {message}")]
    InvalidCredentials { provider: ProviderId, message: String },

    /// The provider rejected the request parameters.
    #[error("invalid request for {provider}: {message}")]
    InvalidRequest { provider: ProviderId, message: String },

    /// Network failure, timeout, throttling, or a 5xx answer.
    #[error("{provider} unavailable: {message}")]
    ProviderUnavailable { provider: ProviderId, message: String },

    /// The provider answered with a body we could not interpret.
    #[error("parse error: {0}")]
    Parse(String),

    /// Polling was stopped through a cancel handle.
    #[error("task cancelled")]
    Cancelled,

    /// The orchestrator or resolver is misconfigured.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Coarse error classification for callers that branch on the kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    InvalidCredentials,
    InvalidRequest,
    ProviderUnavailable,
    Parse,
    Cancelled,
    Configuration,
}

impl GenerationError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_credentials(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            provider,
            message: message.into(),
        }
    }

    pub fn invalid_request(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            provider,
            message: message.into(),
        }
    }

    pub fn unavailable(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::UnknownModel(_) => ErrorKind::Validation,
            Self::InvalidCredentials { .. } => ErrorKind::InvalidCredentials,
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Self::ProviderUnavailable { .. } => ErrorKind::ProviderUnavailable,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// True for errors raised before any network call.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Only transport-level failures are worth retrying, and that policy
    /// belongs to the caller.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::ProviderUnavailable
    }

    /// The provider that produced the error, when one did.
    pub fn provider(&self) -> Option<ProviderId> {
        match self {
            Self::InvalidCredentials { provider, .. }
            | Self::InvalidRequest { provider, .. }
            | Self::ProviderUnavailable { provider, .. } => Some(*provider),
            _ => None,
        }
    }
}

/// Classify a non-success HTTP answer into an error kind.
///
/// 401/403 mean the key was rejected, 408/429/5xx mean the provider is not
/// serving right now, every other status is a parameter rejection.
pub fn classify_http_status(provider: ProviderId, status: u16, body: &str) -> GenerationError {
    let message = if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {}", truncate(body.trim(), 512))
    };
    match status {
        401 | 403 => GenerationError::invalid_credentials(provider, message),
        408 | 429 => GenerationError::unavailable(provider, message),
        s if s >= 500 => GenerationError::unavailable(provider, message),
        _ => GenerationError::invalid_request(provider, message),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_stay_distinct() {
        let validation = GenerationError::validation("empty prompt");
        let creds = GenerationError::invalid_credentials(ProviderId::OpenAi, "bad key");
        let request = GenerationError::invalid_request(ProviderId::OpenAi, "bad size");
        let down = GenerationError::unavailable(ProviderId::OpenAi, "502");

        assert_eq!(validation.kind(), ErrorKind::Validation);
        assert_eq!(creds.kind(), ErrorKind::InvalidCredentials);
        assert_eq!(request.kind(), ErrorKind::InvalidRequest);
        assert_eq!(down.kind(), ErrorKind::ProviderUnavailable);
        assert!(GenerationError::UnknownModel("x".into()).is_validation());
    }

    #[test]
    fn test_only_unavailable_is_retryable() {
        assert!(GenerationError::unavailable(ProviderId::Flux, "timeout").is_retryable());
        assert!(!GenerationError::invalid_request(ProviderId::Flux, "nope").is_retryable());
        assert!(!GenerationError::Cancelled.is_retryable());
    }

    #[test]
    fn test_classify_http_status() {
        let p = ProviderId::Relay;
        assert_eq!(
            classify_http_status(p, 401, "").kind(),
            ErrorKind::InvalidCredentials
        );
        assert_eq!(
            classify_http_status(p, 403, "forbidden").kind(),
            ErrorKind::InvalidCredentials
        );
        assert_eq!(
            classify_http_status(p, 400, "bad").kind(),
            ErrorKind::InvalidRequest
        );
        assert_eq!(
            classify_http_status(p, 429, "slow down").kind(),
            ErrorKind::ProviderUnavailable
        );
        assert_eq!(
            classify_http_status(p, 503, "").kind(),
            ErrorKind::ProviderUnavailable
        );
        assert_eq!(classify_http_status(p, 503, "").provider(), Some(p));
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "x".repeat(2000);
        let err = classify_http_status(ProviderId::OpenAi, 400, &body);
        assert!(err.to_string().len() < 700);
    }
}
