//! OpenAI chat completions (`/v1/chat/completions`) for text generation

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{DEFAULT_BASE_URL, bearer, inline_status, missing_inline_payload};
use crate::config::Credentials;
use crate::error::Result;
use crate::providers::ProviderAdapter;
use crate::providers::http::{send_json, string_at, task_id_at};
use crate::types::{
    GenerationParams, GenerationRequest, Modality, ModelDescriptor, ProviderId, ProviderResponse,
    TaskHandle, TaskStatus,
};
use crate::utils::join_url;

#[derive(Debug, Clone)]
pub struct OpenAiChat {
    http_client: reqwest::Client,
}

impl OpenAiChat {
    pub const MAX_PROMPT_LENGTH: usize = 4000;

    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    pub(crate) fn build_body(request: &GenerationRequest, model: &ModelDescriptor) -> Value {
        let content = if request.reference_images.is_empty() {
            json!(request.prompt)
        } else {
            let mut parts = vec![json!({"type": "text", "text": request.prompt})];
            parts.extend(
                request
                    .reference_images
                    .iter()
                    .map(|url| json!({"type": "image_url", "image_url": {"url": url}})),
            );
            Value::Array(parts)
        };

        let mut body = json!({
            "model": model.id,
            "messages": [{"role": "user", "content": content}],
        });
        if let GenerationParams::Text {
            max_tokens,
            temperature,
            top_p,
        } = &request.params
        {
            if let Some(v) = max_tokens {
                body["max_tokens"] = json!(v);
            }
            if let Some(v) = temperature {
                body["temperature"] = json!(v);
            }
            if let Some(v) = top_p {
                body["top_p"] = json!(v);
            }
        }
        body
    }

    fn translate_status(payload: &Value) -> TaskStatus {
        let filtered = string_at(payload, &["/choices/0/finish_reason"])
            .is_some_and(|r| r.eq_ignore_ascii_case("content_filter"));
        if filtered {
            TaskStatus::Failed
        } else {
            inline_status(payload)
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiChat {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn modality(&self) -> Modality {
        Modality::Text
    }

    fn default_base_url(&self) -> &str {
        DEFAULT_BASE_URL
    }

    fn max_prompt_length(&self) -> usize {
        Self::MAX_PROMPT_LENGTH
    }

    fn validate_key(&self, key: &str) -> bool {
        crate::providers::is_sk_key(key)
    }

    fn validate_params(&self, request: &GenerationRequest, _model: &ModelDescriptor) -> Result<()> {
        if let GenerationParams::Text {
            temperature, top_p, ..
        } = &request.params
        {
            if temperature.is_some_and(|t| !(0.0..=2.0).contains(&t)) {
                return Err(crate::error::GenerationError::validation(
                    "temperature must be between 0 and 2",
                ));
            }
            if top_p.is_some_and(|p| !(0.0..=1.0).contains(&p)) {
                return Err(crate::error::GenerationError::validation(
                    "top_p must be between 0 and 1",
                ));
            }
        }
        Ok(())
    }

    async fn submit(
        &self,
        request: &GenerationRequest,
        model: &ModelDescriptor,
        credentials: &Credentials,
    ) -> Result<TaskHandle> {
        let mut payload = send_json(
            ProviderId::OpenAi,
            self.http_client
                .post(join_url(&credentials.base_url, "/v1/chat/completions"))
                .header("Authorization", bearer(credentials.expose_key()))
                .json(&Self::build_body(request, model)),
        )
        .await?;

        if Self::translate_status(&payload) == TaskStatus::Failed
            && payload.is_object()
            && payload.get("error").is_none()
        {
            payload["fail_reason"] = json!("response blocked by content filter");
        }
        let task_id = task_id_at(&payload, &["/id"])
            .unwrap_or_else(|| format!("chat_{}", uuid::Uuid::new_v4().simple()));
        Ok(TaskHandle::completed(task_id, &model.id, payload))
    }

    async fn poll(&self, handle: &TaskHandle, _credentials: &Credentials) -> Result<ProviderResponse> {
        let payload = handle
            .inline_payload()
            .ok_or_else(|| missing_inline_payload(ProviderId::OpenAi))?;
        Ok(ProviderResponse::new(
            Self::translate_status(payload),
            payload.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ModelDescriptor {
        ModelDescriptor::new("gpt-4o-mini", "GPT-4o mini", ProviderId::OpenAi, Modality::Text)
    }

    #[test]
    fn test_body_carries_sampling_params() {
        let req = GenerationRequest::text("gpt-4o-mini", "hi")
            .with_max_tokens(64)
            .with_top_p(0.5);
        let body = OpenAiChat::build_body(&req, &model());
        assert_eq!(body["messages"][0]["content"], "hi");
        assert_eq!(body["max_tokens"], 64);
        assert_eq!(body["top_p"], 0.5);
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_reference_images_become_content_parts() {
        let req = GenerationRequest::text("gpt-4o-mini", "describe")
            .with_reference_image("https://x/ref.png");
        let body = OpenAiChat::build_body(&req, &model());
        let parts = body["messages"][0]["content"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1]["image_url"]["url"], "https://x/ref.png");
    }

    #[test]
    fn test_content_filter_is_failure() {
        let payload = json!({"choices": [{"finish_reason": "content_filter", "message": {"content": ""}}]});
        assert_eq!(OpenAiChat::translate_status(&payload), TaskStatus::Failed);
        let payload = json!({"choices": [{"finish_reason": "stop", "message": {"content": "ok"}}]});
        assert_eq!(OpenAiChat::translate_status(&payload), TaskStatus::Succeeded);
    }

    #[test]
    fn test_sampling_ranges() {
        let adapter = OpenAiChat::new(reqwest::Client::new());
        let bad = GenerationRequest::text("gpt-4o-mini", "hi").with_temperature(3.0);
        assert!(adapter.validate_params(&bad, &model()).is_err());
        let ok = GenerationRequest::text("gpt-4o-mini", "hi").with_temperature(0.7);
        assert!(adapter.validate_params(&ok, &model()).is_ok());
    }
}
