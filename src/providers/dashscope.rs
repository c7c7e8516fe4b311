//! Alibaba Cloud DashScope video synthesis (Wan models)
//!
//! Submit: `POST /api/v1/services/aigc/video-generation/video-synthesis`
//! with `X-DashScope-Async: enable`, answering `{output: {task_id}}`.
//! Poll: `GET /api/v1/tasks/{id}` answering `{output: {task_status, video_url}}`.

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

pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com";

const SYNTHESIS_PATH: &str = "/api/v1/services/aigc/video-generation/video-synthesis";

#[derive(Debug, Clone)]
pub struct DashScopeVideo {
    http_client: reqwest::Client,
}

impl DashScopeVideo {
    pub const MAX_PROMPT_LENGTH: usize = 800;

    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    pub(crate) fn build_body(request: &GenerationRequest, model: &ModelDescriptor) -> Value {
        let mut input = json!({"prompt": request.prompt});
        if let Some(first) = request.reference_images.first() {
            input["img_url"] = json!(first);
        }

        let mut parameters = json!({"prompt_extend": true});
        if let GenerationParams::Video {
            duration,
            resolution,
            ..
        } = &request.params
        {
            if let Some(d) = duration {
                parameters["duration"] = json!(d);
            }
            if let Some(size) = resolution.as_deref().and_then(dashscope_size) {
                parameters["size"] = json!(size);
            }
        }

        json!({
            "model": model.id,
            "input": input,
            "parameters": parameters,
        })
    }

    pub(crate) fn translate_status(raw: &str) -> TaskStatus {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SUCCEEDED" => TaskStatus::Succeeded,
            "FAILED" | "CANCELED" | "UNKNOWN" => TaskStatus::Failed,
            "RUNNING" => TaskStatus::Running,
            "" | "PENDING" => TaskStatus::Queued,
            other => {
                tracing::warn!(status = other, "unrecognized dashscope status; still polling");
                TaskStatus::Running
            }
        }
    }
}

/// DashScope sizes are `W*H`; tiers and `WxH` are converted.
fn dashscope_size(resolution: &str) -> Option<String> {
    let lower = resolution.trim().to_ascii_lowercase();
    match lower.as_str() {
        "480p" => Some("832*480".to_string()),
        "720p" => Some("1280*720".to_string()),
        "1080p" => Some("1920*1080".to_string()),
        _ => {
            let (w, h) = lower.split_once(['x', '*'])?;
            let (w, h): (u32, u32) = (w.trim().parse().ok()?, h.trim().parse().ok()?);
            Some(format!("{w}*{h}"))
        }
    }
}

#[async_trait]
impl ProviderAdapter for DashScopeVideo {
    fn id(&self) -> ProviderId {
        ProviderId::DashScope
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

    fn validate_params(&self, request: &GenerationRequest, _model: &ModelDescriptor) -> Result<()> {
        if let GenerationParams::Video {
            resolution: Some(r),
            ..
        } = &request.params
            && dashscope_size(r).is_none()
        {
            return Err(GenerationError::validation(format!(
                "dashscope resolution must be 480p, 720p, 1080p or WxH, got '{r}'"
            )));
        }
        Ok(())
    }

    async fn submit(
        &self,
        request: &GenerationRequest,
        model: &ModelDescriptor,
        credentials: &Credentials,
    ) -> Result<TaskHandle> {
        let payload = send_json(
            ProviderId::DashScope,
            self.http_client
                .post(join_url(&credentials.base_url, SYNTHESIS_PATH))
                .header("Authorization", format!("Bearer {}", credentials.expose_key()))
                .header("X-DashScope-Async", "enable")
                .json(&Self::build_body(request, model)),
        )
        .await?;
        let task_id = task_id_at(&payload, &["/output/task_id"]).ok_or_else(|| {
            GenerationError::Parse("dashscope: submit response carries no task id".to_string())
        })?;
        Ok(TaskHandle::new(task_id, &model.id))
    }

    async fn poll(&self, handle: &TaskHandle, credentials: &Credentials) -> Result<ProviderResponse> {
        let path = format!("/api/v1/tasks/{}", urlencoding::encode(&handle.task_id));
        let payload = send_json(
            ProviderId::DashScope,
            self.http_client
                .get(join_url(&credentials.base_url, &path))
                .header("Authorization", format!("Bearer {}", credentials.expose_key())),
        )
        .await?;
        let status =
            Self::translate_status(string_at(&payload, &["/output/task_status"]).unwrap_or(""));
        Ok(ProviderResponse::new(status, payload))
    }
}
