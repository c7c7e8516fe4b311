//! Response Normalizer
//!
//! Turns a terminal [`ProviderResponse`] into a [`GenerationResult`]. Every
//! function here is pure: no I/O, no clock, no configuration lookups.
//!
//! Providers disagree on where content lives, so each modality keeps an
//! ordered list of JSON pointers and the first non-empty string wins.

mod reason;

use serde_json::Value;

use crate::types::{
    Content, GenerationResult, Modality, ProviderResponse, TaskHandle, TaskStatus,
};
use crate::utils::{absolutize_url, json::string_at};

pub use reason::DEFAULT_REASON;

const IMAGE_POINTERS: &[&str] = &[
    "/imageUrl",
    "/image_url",
    "/url",
    "/data/0/url",
    "/data/url",
    "/result/sample",
    "/output/image_url",
    "/output/results/0/url",
    "/images/0/url",
];

const IMAGE_B64_POINTER: &str = "/data/0/b64_json";

const VIDEO_POINTERS: &[&str] = &[
    "/video_url",
    "/videoUrl",
    "/url",
    "/data/url",
    "/data/video_url",
    "/data/0/url",
    "/output/video_url",
    "/file/download_url",
    "/output/0",
    "/result_url",
];

const TEXT_POINTERS: &[&str] = &[
    "/choices/0/message/content",
    "/choices/0/text",
    "/output/text",
    "/text",
    "/content",
];

/// Normalize a terminal response for `modality`.
///
/// `base_url` is the provider base URL relative locators are resolved
/// against.
pub fn normalize(
    modality: Modality,
    response: &ProviderResponse,
    handle: &TaskHandle,
    base_url: &str,
) -> GenerationResult {
    match modality {
        Modality::Image => normalize_image(response, handle, base_url),
        Modality::Video => normalize_video(response, handle, base_url),
        Modality::Text => normalize_text(response, handle, base_url),
    }
}

pub fn normalize_image(
    response: &ProviderResponse,
    handle: &TaskHandle,
    base_url: &str,
) -> GenerationResult {
    normalize_with(response, handle, Modality::Image, |payload| {
        if let Some(url) = string_at(payload, IMAGE_POINTERS) {
            return Some(Content::Url(absolutize_url(base_url, url)));
        }
        string_at(payload, &[IMAGE_B64_POINTER])
            .map(|b64| Content::Url(format!("data:image/png;base64,{b64}")))
    })
}

pub fn normalize_video(
    response: &ProviderResponse,
    handle: &TaskHandle,
    base_url: &str,
) -> GenerationResult {
    normalize_with(response, handle, Modality::Video, |payload| {
        string_at(payload, VIDEO_POINTERS).map(|url| Content::Url(absolutize_url(base_url, url)))
    })
}

/// Text content is returned verbatim; `base_url` is unused.
pub fn normalize_text(
    response: &ProviderResponse,
    handle: &TaskHandle,
    _base_url: &str,
) -> GenerationResult {
    normalize_with(response, handle, Modality::Text, |payload| {
        TEXT_POINTERS
            .iter()
            .filter_map(|p| payload.pointer(p))
            .filter_map(Value::as_str)
            .find(|s| !s.trim().is_empty())
            .map(|s| Content::Text(s.to_string()))
    })
}

fn normalize_with(
    response: &ProviderResponse,
    handle: &TaskHandle,
    modality: Modality,
    extract: impl FnOnce(&Value) -> Option<Content>,
) -> GenerationResult {
    match response.status {
        TaskStatus::Succeeded => match extract(&response.payload) {
            Some(content) => {
                GenerationResult::succeeded(&handle.task_id, &handle.model, modality, content)
            }
            None => {
                tracing::warn!(
                    task_id = %handle.task_id,
                    model = %handle.model,
                    "provider reported success without content"
                );
                GenerationResult::failed(
                    &handle.task_id,
                    &handle.model,
                    modality,
                    GenerationResult::MISSING_CONTENT,
                )
            }
        },
        // Only terminal responses reach here; anything else is read as failure.
        TaskStatus::Failed | TaskStatus::Queued | TaskStatus::Running => {
            let reason = reason::extract_reason(&response.payload);
            let result =
                GenerationResult::failed(&handle.task_id, &handle.model, modality, reason.reason);
            match reason.raw {
                Some(raw) => result.with_raw_reason(raw),
                None => result,
            }
        }
    }
}
