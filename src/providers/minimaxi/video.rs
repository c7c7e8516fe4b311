//! MiniMaxi Video Generation
//!
//! Submit: `POST /v1/video_generation` answers `{task_id, base_resp}`.
//! Poll: `GET /v1/query/video_generation?task_id=...`; once the task reports
//! `Success` its `file_id` is resolved with `GET /v1/files/retrieve`.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{DEFAULT_BASE_URL, check_base_resp};
use crate::config::Credentials;
use crate::error::{GenerationError, Result};
use crate::providers::ProviderAdapter;
use crate::providers::http::{send_json, string_at, task_id_at};
use crate::types::{
    GenerationParams, GenerationRequest, Modality, ModelDescriptor, ProviderId, ProviderResponse,
    TaskHandle, TaskStatus,
};
use crate::utils::join_url;

/// Get video generation endpoint URL
fn video_generation_url(base_url: &str) -> String {
    join_url(base_url, "/v1/video_generation")
}

/// Get video query endpoint URL
fn video_query_url(base_url: &str, task_id: &str) -> String {
    join_url(
        base_url,
        &format!(
            "/v1/query/video_generation?task_id={}",
            urlencoding::encode(task_id)
        ),
    )
}

fn file_retrieve_url(base_url: &str, file_id: &str) -> String {
    join_url(
        base_url,
        &format!("/v1/files/retrieve?file_id={}", urlencoding::encode(file_id)),
    )
}

/// Get supported resolutions for a model
pub(crate) fn supported_resolutions(model: &str) -> &'static [&'static str] {
    match model {
        "MiniMax-Hailuo-2.3" | "MiniMax-Hailuo-02" => &["768P", "1080P"],
        "T2V-01-Director" | "T2V-01" | "I2V-01" => &["720P"],
        _ => &[],
    }
}

/// Get supported durations for a model
pub(crate) fn supported_durations(model: &str, resolution: Option<&str>) -> &'static [u32] {
    match (model, resolution) {
        // 1080P clips are capped at six seconds.
        ("MiniMax-Hailuo-2.3" | "MiniMax-Hailuo-02", Some("1080P")) => &[6],
        ("MiniMax-Hailuo-2.3" | "MiniMax-Hailuo-02", _) => &[6, 10],
        ("T2V-01-Director" | "T2V-01" | "I2V-01", _) => &[6],
        _ => &[],
    }
}

#[derive(Debug, Clone)]
pub struct MinimaxiVideo {
    http_client: reqwest::Client,
}

impl MinimaxiVideo {
    pub const MAX_PROMPT_LENGTH: usize = 2000;

    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    pub(crate) fn build_body(request: &GenerationRequest, model: &ModelDescriptor) -> Value {
        let mut body = json!({
            "model": model.id,
            "prompt": request.prompt,
        });
        if let GenerationParams::Video {
            duration,
            resolution,
            ..
        } = &request.params
        {
            if let Some(d) = duration {
                body["duration"] = json!(d);
            }
            if let Some(r) = resolution {
                body["resolution"] = json!(r.to_ascii_uppercase());
            }
        }
        if let Some(first) = request.reference_images.first() {
            body["first_frame_image"] = json!(first);
        }
        body
    }

    pub(crate) fn translate_status(raw: &str) -> TaskStatus {
        match raw.trim().to_ascii_lowercase().as_str() {
            "success" => TaskStatus::Succeeded,
            "fail" | "failed" => TaskStatus::Failed,
            "processing" => TaskStatus::Running,
            "preparing" | "queueing" | "" => TaskStatus::Queued,
            other => {
                tracing::warn!(status = other, "unrecognized minimaxi status; still polling");
                TaskStatus::Running
            }
        }
    }

    async fn get(&self, url: String, credentials: &Credentials) -> Result<Value> {
        let payload = send_json(
            ProviderId::Minimaxi,
            self.http_client
                .get(url)
                .header("Authorization", format!("Bearer {}", credentials.expose_key())),
        )
        .await?;
        check_base_resp(&payload)?;
        Ok(payload)
    }
}

#[async_trait]
impl ProviderAdapter for MinimaxiVideo {
    fn id(&self) -> ProviderId {
        ProviderId::Minimaxi
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
        crate::providers::is_opaque_key(key, 32)
    }

    fn validate_params(&self, request: &GenerationRequest, model: &ModelDescriptor) -> Result<()> {
        let GenerationParams::Video {
            duration,
            resolution,
            ..
        } = &request.params
        else {
            return Ok(());
        };
        let resolution = resolution.as_deref().map(str::to_ascii_uppercase);
        let resolutions = supported_resolutions(&model.id);
        if let Some(r) = &resolution
            && !resolutions.is_empty()
            && !resolutions.contains(&r.as_str())
        {
            return Err(GenerationError::validation(format!(
                "{} supports resolutions {resolutions:?}, got {r}",
                model.id
            )));
        }
        let durations = supported_durations(&model.id, resolution.as_deref());
        if let Some(d) = duration
            && !durations.is_empty()
            && !durations.contains(d)
        {
            return Err(GenerationError::validation(format!(
                "{} supports durations {durations:?}, got {d}",
                model.id
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
            ProviderId::Minimaxi,
            self.http_client
                .post(video_generation_url(&credentials.base_url))
                .header("Authorization", format!("Bearer {}", credentials.expose_key()))
                .json(&Self::build_body(request, model)),
        )
        .await?;
        check_base_resp(&payload)?;
        let task_id = task_id_at(&payload, &["/task_id"]).ok_or_else(|| {
            GenerationError::Parse("minimaxi: submit response carries no task_id".to_string())
        })?;
        Ok(TaskHandle::new(task_id, &model.id))
    }

    async fn poll(&self, handle: &TaskHandle, credentials: &Credentials) -> Result<ProviderResponse> {
        let mut payload = self
            .get(video_query_url(&credentials.base_url, &handle.task_id), credentials)
            .await?;
        let status = Self::translate_status(string_at(&payload, &["/status"]).unwrap_or(""));

        // A failed task still answers base_resp "success"; that must not
        // become the reason.
        if status == TaskStatus::Failed && payload.is_object() {
            let reason = string_at(&payload, &["/error_message"])
                .unwrap_or("video generation failed")
                .to_string();
            payload["fail_reason"] = json!(reason);
        }

        if status == TaskStatus::Succeeded
            && let Some(file_id) = task_id_at(&payload, &["/file_id"])
        {
            let file = self
                .get(file_retrieve_url(&credentials.base_url, &file_id), credentials)
                .await?;
            if let Some(file) = file.get("file") {
                payload["file"] = file.clone();
            }
        }
        Ok(ProviderResponse::new(status, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hailuo() -> ModelDescriptor {
        ModelDescriptor::new(
            "MiniMax-Hailuo-02",
            "Hailuo 02",
            ProviderId::Minimaxi,
            Modality::Video,
        )
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            video_query_url("https://api.minimaxi.com/", "abc 1"),
            "https://api.minimaxi.com/v1/query/video_generation?task_id=abc%201"
        );
        assert_eq!(
            video_generation_url("https://api.minimaxi.com"),
            "https://api.minimaxi.com/v1/video_generation"
        );
    }

    #[test]
    fn test_status_vocabulary() {
        assert_eq!(MinimaxiVideo::translate_status("Success"), TaskStatus::Succeeded);
        assert_eq!(MinimaxiVideo::translate_status("Fail"), TaskStatus::Failed);
        assert_eq!(MinimaxiVideo::translate_status("Processing"), TaskStatus::Running);
        assert_eq!(MinimaxiVideo::translate_status("Queueing"), TaskStatus::Queued);
        assert_eq!(MinimaxiVideo::translate_status("Preparing"), TaskStatus::Queued);
    }

    #[test]
    fn test_params_follow_model_tables() {
        let adapter = MinimaxiVideo::new(reqwest::Client::new());
        let ok = GenerationRequest::video("MiniMax-Hailuo-02", "waves")
            .with_duration(10)
            .with_resolution("768p");
        assert!(adapter.validate_params(&ok, &hailuo()).is_ok());

        let long_1080 = GenerationRequest::video("MiniMax-Hailuo-02", "waves")
            .with_duration(10)
            .with_resolution("1080P");
        assert!(adapter.validate_params(&long_1080, &hailuo()).is_err());

        let bad_res = GenerationRequest::video("MiniMax-Hailuo-02", "waves").with_resolution("4K");
        assert!(adapter.validate_params(&bad_res, &hailuo()).is_err());
    }

    #[test]
    fn test_body() {
        let req = GenerationRequest::video("MiniMax-Hailuo-02", "waves")
            .with_duration(6)
            .with_resolution("768p")
            .with_reference_image("https://x/first.png");
        let body = MinimaxiVideo::build_body(&req, &hailuo());
        assert_eq!(body["model"], "MiniMax-Hailuo-02");
        assert_eq!(body["duration"], 6);
        assert_eq!(body["resolution"], "768P");
        assert_eq!(body["first_frame_image"], "https://x/first.png");
    }
}
