//! OpenAI image generation (`/v1/images/generations`)

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{DEFAULT_BASE_URL, bearer, inline_status, missing_inline_payload};
use crate::config::Credentials;
use crate::error::Result;
use crate::providers::ProviderAdapter;
use crate::providers::http::{send_json, task_id_at};
use crate::types::{
    GenerationParams, GenerationRequest, Modality, ModelDescriptor, ProviderId, ProviderResponse,
    TaskHandle,
};
use crate::utils::join_url;

#[derive(Debug, Clone)]
pub struct OpenAiImages {
    http_client: reqwest::Client,
}

impl OpenAiImages {
    pub const MAX_PROMPT_LENGTH: usize = 4000;

    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    fn endpoint(base_url: &str) -> String {
        join_url(base_url, "/v1/images/generations")
    }

    pub(crate) fn build_body(request: &GenerationRequest, model: &ModelDescriptor) -> Value {
        let mut body = json!({
            "model": model.id,
            "prompt": request.prompt,
            "n": 1,
        });
        if let GenerationParams::Image { size, aspect_ratio } = &request.params {
            let size = size
                .clone()
                .or_else(|| aspect_ratio.as_deref().and_then(|r| size_for_ratio(&model.id, r)));
            if let Some(size) = size {
                body["size"] = json!(size);
            }
        }
        body
    }
}

/// Closest supported size for an aspect ratio.
fn size_for_ratio(model: &str, ratio: &str) -> Option<String> {
    let (w, h) = ratio.split_once(':')?;
    let (w, h): (f64, f64) = (w.trim().parse().ok()?, h.trim().parse().ok()?);
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    let r = w / h;
    let dall_e = model.starts_with("dall-e-3");
    let size = if (r - 1.0).abs() < 0.1 {
        "1024x1024"
    } else if r > 1.0 {
        if dall_e { "1792x1024" } else { "1536x1024" }
    } else if dall_e {
        "1024x1792"
    } else {
        "1024x1536"
    };
    Some(size.to_string())
}

#[async_trait]
impl ProviderAdapter for OpenAiImages {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn modality(&self) -> Modality {
        Modality::Image
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

    async fn submit(
        &self,
        request: &GenerationRequest,
        model: &ModelDescriptor,
        credentials: &Credentials,
    ) -> Result<TaskHandle> {
        let body = Self::build_body(request, model);
        let payload = send_json(
            ProviderId::OpenAi,
            self.http_client
                .post(Self::endpoint(&credentials.base_url))
                .header("Authorization", bearer(credentials.expose_key()))
                .json(&body),
        )
        .await?;

        let task_id = task_id_at(&payload, &["/id"])
            .unwrap_or_else(|| format!("img_{}", uuid::Uuid::new_v4().simple()));
        Ok(TaskHandle::completed(task_id, &model.id, payload))
    }

    async fn poll(&self, handle: &TaskHandle, _credentials: &Credentials) -> Result<ProviderResponse> {
        let payload = handle
            .inline_payload()
            .ok_or_else(|| missing_inline_payload(ProviderId::OpenAi))?;
        Ok(ProviderResponse::new(inline_status(payload), payload.clone()))
    }
}
