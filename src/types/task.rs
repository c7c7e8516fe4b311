//! Task handles and the shared status vocabulary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shared four-value task status.
///
/// Adapters translate every provider vocabulary into this enum; nothing
/// above the adapter layer sees provider status strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl TaskStatus {
    /// Succeeded and Failed end polling.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Succeeded | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Queued => write!(f, "Queued"),
            TaskStatus::Running => write!(f, "Running"),
            TaskStatus::Succeeded => write!(f, "Succeeded"),
            TaskStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Provider-assigned job identifier plus the model it belongs to.
///
/// Handles are immutable once created and serializable, so a caller can
/// store one and resume polling later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskHandle {
    /// Opaque provider task id
    pub task_id: String,
    /// Model descriptor id
    pub model: String,
    pub submitted_at: DateTime<Utc>,
    /// Terminal payload of a provider that answers synchronously
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_payload: Option<serde_json::Value>,
}

impl TaskHandle {
    pub fn new(task_id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            model: model.into(),
            submitted_at: Utc::now(),
            inline_payload: None,
        }
    }

    /// Handle for a job the provider finished during submission.
    pub fn completed(
        task_id: impl Into<String>,
        model: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            inline_payload: Some(payload),
            ..Self::new(task_id, model)
        }
    }

    pub fn inline_payload(&self) -> Option<&serde_json::Value> {
        self.inline_payload.as_ref()
    }
}

/// One poll answer, already translated to the shared status.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub status: TaskStatus,
    /// Raw provider body, consumed by the normalizer once terminal
    pub payload: serde_json::Value,
}

impl ProviderResponse {
    pub fn new(status: TaskStatus, payload: serde_json::Value) -> Self {
        Self { status, payload }
    }
}
