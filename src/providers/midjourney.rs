//! Midjourney through a midjourney-proxy compatible endpoint
//!
//! Submit: `POST /mj/submit/imagine` answers `{code, description, result}`
//! where `result` is the task id. Poll: `GET /mj/task/{id}/fetch`.
//! Authentication uses the `mj-api-secret` header.

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

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Submit codes: 1 submitted, 21 already exists, 22 queued.
const ACCEPTED_CODES: [i64; 3] = [1, 21, 22];

lazy_static::lazy_static! {
    static ref ASPECT_FLAG: regex::Regex =
        regex::Regex::new(r"(?i)(^|\s)--(ar|aspect)\s+\d+:\d+").expect("valid aspect flag regex");
}

fn has_aspect_flag(prompt: &str) -> bool {
    ASPECT_FLAG.is_match(prompt)
}

#[derive(Debug, Clone)]
pub struct Midjourney {
    http_client: reqwest::Client,
}

impl Midjourney {
    pub const MAX_PROMPT_LENGTH: usize = 1500;

    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// Reference URLs lead the prompt (Midjourney image prompts); data URIs
    /// travel in `base64Array`. Aspect ratio becomes an `--ar` flag.
    pub(crate) fn build_body(request: &GenerationRequest) -> Value {
        let mut prompt = String::new();
        let mut base64_array = Vec::new();
        for image in &request.reference_images {
            if image.starts_with("data:") {
                base64_array.push(image.clone());
            } else {
                prompt.push_str(image);
                prompt.push(' ');
            }
        }
        prompt.push_str(request.prompt.trim());

        if let GenerationParams::Image {
            aspect_ratio: Some(ratio),
            ..
        } = &request.params
            && !has_aspect_flag(&prompt)
        {
            prompt.push_str(&format!(" --ar {ratio}"));
        }

        let mut body = json!({
            "prompt": prompt,
            "botType": "MID_JOURNEY",
        });
        if !base64_array.is_empty() {
            body["base64Array"] = json!(base64_array);
        }
        body
    }

    pub(crate) fn translate_status(raw: &str) -> TaskStatus {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SUCCESS" => TaskStatus::Succeeded,
            "FAILURE" | "CANCEL" => TaskStatus::Failed,
            "IN_PROGRESS" | "MODAL" => TaskStatus::Running,
            "" | "NOT_START" | "SUBMITTED" => TaskStatus::Queued,
            other => {
                tracing::warn!(status = other, "unrecognized midjourney status; still polling");
                TaskStatus::Running
            }
        }
    }

    fn check_submit(payload: &Value) -> Result<String> {
        let code = payload.get("code").and_then(Value::as_i64).unwrap_or(-1);
        let description = string_at(payload, &["/description"]).unwrap_or("submission rejected");
        if !ACCEPTED_CODES.contains(&code) {
            return Err(GenerationError::invalid_request(
                ProviderId::Midjourney,
                format!("code {code}: {description}"),
            ));
        }
        task_id_at(payload, &["/result"]).ok_or_else(|| {
            GenerationError::Parse("midjourney: submit response carries no task id".to_string())
        })
    }
}

#[async_trait]
impl ProviderAdapter for Midjourney {
    fn id(&self) -> ProviderId {
        ProviderId::Midjourney
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
        crate::providers::is_opaque_key(key, 8)
    }

    async fn submit(
        &self,
        request: &GenerationRequest,
        model: &ModelDescriptor,
        credentials: &Credentials,
    ) -> Result<TaskHandle> {
        let payload = send_json(
            ProviderId::Midjourney,
            self.http_client
                .post(join_url(&credentials.base_url, "/mj/submit/imagine"))
                .header("mj-api-secret", credentials.expose_key())
                .json(&Self::build_body(request)),
        )
        .await?;
        let task_id = Self::check_submit(&payload)?;
        Ok(TaskHandle::new(task_id, &model.id))
    }

    async fn poll(&self, handle: &TaskHandle, credentials: &Credentials) -> Result<ProviderResponse> {
        let path = format!("/mj/task/{}/fetch", urlencoding::encode(&handle.task_id));
        let payload = send_json(
            ProviderId::Midjourney,
            self.http_client
                .get(join_url(&credentials.base_url, &path))
                .header("mj-api-secret", credentials.expose_key()),
        )
        .await?;
        let status = Self::translate_status(string_at(&payload, &["/status"]).unwrap_or(""));
        Ok(ProviderResponse::new(status, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_vocabulary() {
        assert_eq!(Midjourney::translate_status("SUCCESS"), TaskStatus::Succeeded);
        assert_eq!(Midjourney::translate_status("success"), TaskStatus::Succeeded);
        assert_eq!(Midjourney::translate_status("FAILURE"), TaskStatus::Failed);
        assert_eq!(Midjourney::translate_status("CANCEL"), TaskStatus::Failed);
        assert_eq!(Midjourney::translate_status("IN_PROGRESS"), TaskStatus::Running);
        assert_eq!(Midjourney::translate_status("SUBMITTED"), TaskStatus::Queued);
        assert_eq!(Midjourney::translate_status("NOT_START"), TaskStatus::Queued);
        assert_eq!(Midjourney::translate_status(""), TaskStatus::Queued);
    }

    #[test]
    fn test_body_places_references_and_ratio() {
        let req = GenerationRequest::image("midjourney", "a red bicycle")
            .with_aspect_ratio("16:9")
            .with_reference_image("https://x/ref.png")
            .with_reference_image("data:image/png;base64,AAAA");
        let body = Midjourney::build_body(&req);
        assert_eq!(body["prompt"], "https://x/ref.png a red bicycle --ar 16:9");
        assert_eq!(body["base64Array"][0], "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_explicit_ar_flag_is_kept() {
        let req = GenerationRequest::image("midjourney", "a cat --ar 2:3").with_aspect_ratio("16:9");
        assert_eq!(Midjourney::build_body(&req)["prompt"], "a cat --ar 2:3");
    }

    #[test]
    fn test_aspect_flag_detection() {
        assert!(has_aspect_flag("a cat --ar 2:3"));
        assert!(has_aspect_flag("a cat --ASPECT 16:9 --v 6"));
        assert!(!has_aspect_flag("a cat --art"));
        assert!(!has_aspect_flag("a cat"));
    }

    #[test]
    fn test_submit_codes() {
        assert_eq!(
            Midjourney::check_submit(&json!({"code": 1, "result": "1712"})).unwrap(),
            "1712"
        );
        assert_eq!(
            Midjourney::check_submit(&json!({"code": 22, "result": 1713})).unwrap(),
            "1713"
        );
        let err = Midjourney::check_submit(&json!({"code": 24, "description": "banned prompt"}))
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidRequest { .. }));
        assert!(err.to_string().contains("banned prompt"));
    }
}
