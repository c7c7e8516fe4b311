//! # unigen - Unified Generation Tasks
//!
//! One interface for asking several third-party AI providers for images,
//! videos and text. Each request is validated against the target provider's
//! rules, submitted, polled until it reaches a terminal state (or the poll
//! budget runs out), and normalized into a single result shape.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use unigen::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let config = StaticConfig::new()
//!         .with_api_key(ProviderId::Relay, "sk-your-relay-key-0000")
//!         .with_base_url(ProviderId::Relay, "https://relay.example.com");
//!     let service = ModelService::new(config);
//!
//!     let request = GenerationRequest::video("sora-2", "a paper boat drifting down a gutter")
//!         .with_duration(8)
//!         .with_aspect_ratio("16:9");
//!     let handle = service.create_task(&request).await?;
//!     let result = service.get_task_status(&request.with_task(handle)).await?;
//!
//!     match result.url() {
//!         Some(url) => println!("video: {url}"),
//!         None => println!("failed: {}", result.failure_reason().unwrap_or_default()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Outcomes
//!
//! A provider that reports failure, or a task that never finishes within
//! the poll budget, yields `Ok(GenerationResult)` with a `Failed` status.
//! `Err(GenerationError)` means the request was rejected locally, the
//! provider could not be reached or answered something unreadable, or the
//! caller cancelled.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod normalize;
pub mod observability;
pub mod orchestrator;
pub mod providers;
pub mod registry;
pub mod types;
pub mod utils;

pub use config::{ConfigResolver, EnvConfig, PollPolicy, StaticConfig};
pub use error::{ErrorKind, GenerationError, Result};
pub use orchestrator::{FailurePolicy, ModelService, TaskOrchestrator, TaskOrchestratorBuilder};
pub use registry::ModelRegistry;
pub use registry::catalog::{model, model_info, models, models_for};
pub use types::{
    Content, GenerationParams, GenerationRequest, GenerationResult, Modality, ModelCapabilities,
    ModelDescriptor, ModelInfo, Outcome, ProviderId, ProviderResponse, TaskHandle, TaskStatus,
};
pub use utils::CancelHandle;

/// Common imports.
pub mod prelude {
    pub use crate::config::{ConfigResolver, EnvConfig, PollPolicy, StaticConfig};
    pub use crate::error::{GenerationError, Result};
    pub use crate::orchestrator::{FailurePolicy, ModelService, TaskOrchestrator};
    pub use crate::providers::ProviderAdapter;
    pub use crate::types::{
        Content, GenerationRequest, GenerationResult, Modality, ModelDescriptor, ProviderId,
        TaskHandle, TaskStatus,
    };
    pub use crate::utils::CancelHandle;
}
