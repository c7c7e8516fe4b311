//! OpenAI Provider
//!
//! Images and chat completions both answer synchronously: the job finishes
//! during `submit`, and the returned handle carries the terminal payload so
//! `poll` never touches the network.

mod chat;
mod images;

pub use chat::OpenAiChat;
pub use images::OpenAiImages;

/// Default API origin. Endpoint paths include the `/v1` prefix.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

fn bearer(key: &str) -> String {
    format!("Bearer {key}")
}

/// Status of an inline payload: an `error` object means the provider
/// reported failure inside a 2xx answer.
fn inline_status(payload: &serde_json::Value) -> crate::types::TaskStatus {
    if payload.get("error").is_some_and(|e| !e.is_null()) {
        crate::types::TaskStatus::Failed
    } else {
        crate::types::TaskStatus::Succeeded
    }
}

fn missing_inline_payload(provider: crate::types::ProviderId) -> crate::error::GenerationError {
    crate::error::GenerationError::validation(format!(
        "{provider} answers synchronously; its task handle must carry the result"
    ))
}
