//! OpenAI-compatible video relay (new-api / one-api style gateways)
//!
//! Submit: `POST /v1/video/generations` answers `{task_id}`.
//! Poll: `GET /v1/video/generations/{id}`; some gateways wrap the task in a
//! `data` envelope, others keep `status` at the top level and only put the
//! result under `data`. Both shapes are flattened before normalization.

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::config::Credentials;
use crate::error::{GenerationError, Result};
use crate::providers::ProviderAdapter;
use crate::providers::http::{send_json, string_at, task_id_at};
use crate::types::{
    GenerationParams, GenerationRequest, Modality, ModelDescriptor, ProviderId, ProviderResponse,
    TaskHandle, TaskStatus,
};
use crate::utils::join_url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct RelayVideo {
    http_client: reqwest::Client,
}

impl RelayVideo {
    pub const MAX_PROMPT_LENGTH: usize = 1000;

    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    pub(crate) fn build_body(request: &GenerationRequest, model: &ModelDescriptor) -> Value {
        let mut body = json!({
            "model": model.id,
            "prompt": request.prompt,
        });
        if let Some(first) = request.reference_images.first() {
            body["image"] = json!(first);
        }
        if let GenerationParams::Video {
            duration,
            resolution,
            style,
            aspect_ratio,
        } = &request.params
        {
            if let Some(d) = duration {
                body["duration"] = json!(d);
            }
            if let Some(r) = resolution {
                // "1280x720" is a size; "720p" is a resolution tier.
                let field = if r.contains(['x', 'X', '*']) { "size" } else { "resolution" };
                body[field] = json!(r);
            }
            let mut metadata = Map::new();
            if let Some(ratio) = aspect_ratio {
                metadata.insert("aspect_ratio".into(), json!(ratio));
            }
            if let Some(style) = style {
                metadata.insert("style".into(), json!(style));
            }
            if !metadata.is_empty() {
                body["metadata"] = Value::Object(metadata);
            }
        }
        body
    }

    pub(crate) fn translate_status(raw: &str) -> TaskStatus {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SUCCESS" | "SUCCEEDED" | "COMPLETED" => TaskStatus::Succeeded,
            "FAILURE" | "FAILED" => TaskStatus::Failed,
            "IN_PROGRESS" | "PROCESSING" => TaskStatus::Running,
            "" | "NOT_START" | "SUBMITTED" | "QUEUED" => TaskStatus::Queued,
            other => {
                tracing::warn!(status = other, "unrecognized relay status; still polling");
                TaskStatus::Running
            }
        }
    }

    /// Flatten a `data` object into the top level. Fields inside `data` win
    /// on conflict; top-level fields `data` lacks (a flat `status`,
    /// `fail_reason`) are kept.
    fn unwrap_envelope(payload: Value) -> Value {
        let Value::Object(mut map) = payload else {
            return payload;
        };
        if !map.get("data").is_some_and(Value::is_object) {
            return Value::Object(map);
        }
        if let Some(Value::Object(data)) = map.remove("data") {
            map.extend(data);
        }
        Value::Object(map)
    }
}

#[async_trait]
impl ProviderAdapter for RelayVideo {
    fn id(&self) -> ProviderId {
        ProviderId::Relay
    }

    fn modality(&self) -> Modality {
        Modality::Video
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
        let payload = send_json(
            ProviderId::Relay,
            self.http_client
                .post(join_url(&credentials.base_url, "/v1/video/generations"))
                .header("Authorization", format!("Bearer {}", credentials.expose_key()))
                .json(&Self::build_body(request, model)),
        )
        .await?;
        let task_id = task_id_at(&payload, &["/task_id", "/id", "/data/task_id", "/data/id"])
            .ok_or_else(|| {
                GenerationError::Parse("relay: submit response carries no task id".to_string())
            })?;
        Ok(TaskHandle::new(task_id, &model.id))
    }

    async fn poll(&self, handle: &TaskHandle, credentials: &Credentials) -> Result<ProviderResponse> {
        let path = format!("/v1/video/generations/{}", urlencoding::encode(&handle.task_id));
        let payload = send_json(
            ProviderId::Relay,
            self.http_client
                .get(join_url(&credentials.base_url, &path))
                .header("Authorization", format!("Bearer {}", credentials.expose_key())),
        )
        .await?;
        let payload = Self::unwrap_envelope(payload);
        let status = Self::translate_status(string_at(&payload, &["/status"]).unwrap_or(""));
        Ok(ProviderResponse::new(status, payload))
    }
}
