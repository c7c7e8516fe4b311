//! HTTP plumbing shared by the adapters
//!
//! Centralizes sending, status classification and JSON decoding so every
//! adapter maps transport failures to the same error kinds.

use std::time::{Duration, Instant};

use reqwest::RequestBuilder;
use serde_json::Value;

use crate::error::{GenerationError, Result, classify_http_status, transport_error};
use crate::types::ProviderId;

pub(crate) use crate::utils::json::{string_at, task_id_at};

/// Per-request timeout for a single submit or poll call.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Build the default HTTP client used by the stock adapters.
pub(crate) fn default_http_client() -> reqwest::Client {
    client_or_fallback(reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build())
}

fn client_or_fallback(built: reqwest::Result<reqwest::Client>) -> reqwest::Client {
    built.unwrap_or_else(|e| {
        tracing::warn!(
            error = %e,
            timeout_secs = REQUEST_TIMEOUT.as_secs(),
            "HTTP client build failed; falling back to a client without request timeout"
        );
        reqwest::Client::new()
    })
}

/// Send `request`, classify non-2xx answers and decode the JSON body.
pub(crate) async fn send_json(provider: ProviderId, request: RequestBuilder) -> Result<Value> {
    let started = Instant::now();
    let response = request
        .send()
        .await
        .map_err(|e| transport_error(provider, e))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| transport_error(provider, e))?;
    tracing::debug!(
        provider = %provider,
        status = status.as_u16(),
        duration_ms = started.elapsed().as_millis() as u64,
        "provider answered"
    );

    if !status.is_success() {
        tracing::warn!(provider = %provider, status = status.as_u16(), "provider rejected call");
        return Err(classify_http_status(provider, status.as_u16(), &text));
    }

    parse_body(provider, &text)
}

fn parse_body(provider: ProviderId, text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Err(GenerationError::Parse(format!("{provider}: empty response body")));
    }
    serde_json::from_str(text)
        .map_err(|e| GenerationError::Parse(format!("{provider}: invalid JSON response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_client_fallback_is_logged() {
        let failed = reqwest::Client::new().get("not a url").build().map(|_| reqwest::Client::new());
        assert!(failed.is_err());
        let _client = client_or_fallback(failed);
        assert!(logs_contain("falling back to a client without request timeout"));
    }

    #[test]
    #[traced_test]
    fn test_default_client_builds_quietly() {
        let _client = default_http_client();
        assert!(!logs_contain("falling back"));
    }

    #[test]
    fn test_parse_body_errors() {
        assert!(matches!(
            parse_body(ProviderId::Flux, ""),
            Err(GenerationError::Parse(_))
        ));
        assert!(matches!(
            parse_body(ProviderId::Flux, "<html>"),
            Err(GenerationError::Parse(_))
        ));
    }
}
