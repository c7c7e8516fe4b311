//! Black Forest Labs FLUX API
//!
//! Submit: `POST /v1/{model}` answers `{id, polling_url}`.
//! Poll: `GET /v1/get_result?id=...` answers `{id, status, result: {sample}}`.
//! Authentication uses the `x-key` header.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::config::Credentials;
use crate::error::{GenerationError, Result};
use crate::providers::ProviderAdapter;
use crate::providers::http::{send_json, string_at, task_id_at};
use crate::types::{
    GenerationParams, GenerationRequest, Modality, ModelDescriptor, ProviderId, ProviderResponse,
    TaskHandle, TaskStatus,
};
use crate::utils::join_url;

pub const DEFAULT_BASE_URL: &str = "https://api.bfl.ai";

#[derive(Debug, Clone)]
pub struct Flux {
    http_client: reqwest::Client,
}

impl Flux {
    pub const MAX_PROMPT_LENGTH: usize = 2000;

    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    pub(crate) fn build_body(request: &GenerationRequest, model: &ModelDescriptor) -> Value {
        let mut body = json!({
            "prompt": request.prompt,
            "output_format": "png",
        });
        if let GenerationParams::Image { size, aspect_ratio } = &request.params {
            if let Some(ratio) = aspect_ratio {
                body["aspect_ratio"] = json!(ratio);
            } else if let Some((w, h)) = size.as_deref().and_then(parse_size) {
                body["width"] = json!(w);
                body["height"] = json!(h);
            }
        }
        if let Some(first) = request.reference_images.first() {
            // Kontext models edit an input image; the others take an image prompt.
            let field = if model.id.contains("kontext") {
                "input_image"
            } else {
                "image_prompt"
            };
            body[field] = json!(first);
        }
        body
    }

    /// Provider statuses. "Task not found" shows up right after submission
    /// while the id propagates.
    pub(crate) fn translate_status(raw: &str) -> TaskStatus {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ready" => TaskStatus::Succeeded,
            "error" | "failed" | "content moderated" | "request moderated" => TaskStatus::Failed,
            "processing" => TaskStatus::Running,
            "pending" | "task not found" | "queued" => TaskStatus::Queued,
            other => {
                tracing::warn!(status = other, "unrecognized flux status; still polling");
                TaskStatus::Running
            }
        }
    }
}

/// "1024x768" → (1024, 768), snapped down to multiples of 32.
fn parse_size(size: &str) -> Option<(u32, u32)> {
    let lower = size.to_ascii_lowercase();
    let (w, h) = lower.split_once('x')?;
    let (w, h): (u32, u32) = (w.trim().parse().ok()?, h.trim().parse().ok()?);
    Some((w - w % 32, h - h % 32))
}

#[async_trait]
impl ProviderAdapter for Flux {
    fn id(&self) -> ProviderId {
        ProviderId::Flux
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
        crate::providers::is_opaque_key(key, 16)
    }

    fn validate_params(&self, request: &GenerationRequest, _model: &ModelDescriptor) -> Result<()> {
        if let GenerationParams::Image {
            size: Some(size), ..
        } = &request.params
        {
            match parse_size(size) {
                Some((w, h)) if (256..=1440).contains(&w) && (256..=1440).contains(&h) => {}
                _ => {
                    return Err(GenerationError::validation(format!(
                        "flux size must be WxH within 256..=1440, got '{size}'"
                    )));
                }
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
        let path = format!("/v1/{}", model.id);
        let payload = send_json(
            ProviderId::Flux,
            self.http_client
                .post(join_url(&credentials.base_url, &path))
                .header("x-key", credentials.expose_key())
                .json(&Self::build_body(request, model)),
        )
        .await?;
        let task_id = task_id_at(&payload, &["/id"]).ok_or_else(|| {
            GenerationError::Parse("flux: submit response carries no task id".to_string())
        })?;
        Ok(TaskHandle::new(task_id, &model.id))
    }

    async fn poll(&self, handle: &TaskHandle, credentials: &Credentials) -> Result<ProviderResponse> {
        let path = format!("/v1/get_result?id={}", urlencoding::encode(&handle.task_id));
        let mut payload = send_json(
            ProviderId::Flux,
            self.http_client
                .get(join_url(&credentials.base_url, &path))
                .header("x-key", credentials.expose_key()),
        )
        .await?;
        let raw = string_at(&payload, &["/status"]).unwrap_or("").to_string();
        let status = Self::translate_status(&raw);
        // Moderation outcomes only name themselves in `status`.
        if status == TaskStatus::Failed
            && payload.is_object()
            && string_at(&payload, &["/details", "/error"]).is_none()
        {
            payload["fail_reason"] = json!(raw.to_ascii_lowercase());
        }
        Ok(ProviderResponse::new(status, payload))
    }
}
