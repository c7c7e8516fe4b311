//! Uniform generation result

use serde::{Deserialize, Serialize};

use super::model::Modality;
use super::task::TaskStatus;

/// Generated content locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Content {
    /// Absolute URL (or data URI) of an image or video
    Url(String),
    /// Generated text
    Text(String),
}

impl Content {
    pub fn as_str(&self) -> &str {
        match self {
            Content::Url(s) | Content::Text(s) => s,
        }
    }
}

/// Terminal outcome of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Outcome {
    Succeeded {
        content: Content,
    },
    Failed {
        /// Human-readable reason
        reason: String,
        /// Original provider string when `reason` was unwrapped from it
        #[serde(default, skip_serializing_if = "Option::is_none")]
        raw_reason: Option<String>,
    },
}

/// Result of a generation task. Its status is always terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub task_id: String,
    pub model: String,
    pub modality: Modality,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl GenerationResult {
    pub const MISSING_CONTENT: &'static str = "missing content in success response";
    pub const TIMED_OUT: &'static str = "status query timed out";

    pub fn succeeded(
        task_id: impl Into<String>,
        model: impl Into<String>,
        modality: Modality,
        content: Content,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            model: model.into(),
            modality,
            outcome: Outcome::Succeeded { content },
        }
    }

    pub fn failed(
        task_id: impl Into<String>,
        model: impl Into<String>,
        modality: Modality,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            model: model.into(),
            modality,
            outcome: Outcome::Failed {
                reason: reason.into(),
                raw_reason: None,
            },
        }
    }

    pub fn with_raw_reason(mut self, raw: impl Into<String>) -> Self {
        if let Outcome::Failed { raw_reason, .. } = &mut self.outcome {
            *raw_reason = Some(raw.into());
        }
        self
    }

    pub fn status(&self) -> TaskStatus {
        match self.outcome {
            Outcome::Succeeded { .. } => TaskStatus::Succeeded,
            Outcome::Failed { .. } => TaskStatus::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == TaskStatus::Succeeded
    }

    pub fn content(&self) -> Option<&Content> {
        match &self.outcome {
            Outcome::Succeeded { content } => Some(content),
            Outcome::Failed { .. } => None,
        }
    }

    /// Locator of an image or video result.
    pub fn url(&self) -> Option<&str> {
        match self.content() {
            Some(Content::Url(url)) => Some(url),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self.content() {
            Some(Content::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failed { reason, .. } => Some(reason),
            Outcome::Succeeded { .. } => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.failure_reason() == Some(Self::TIMED_OUT)
    }
}
