//! Shared types for generation tasks
//!
//! Every type here is provider-agnostic. Provider-specific vocabulary never
//! leaves the adapters in `crate::providers`.

pub mod model;
pub mod request;
pub mod result;
pub mod task;

pub use model::{Modality, ModelCapabilities, ModelDescriptor, ModelInfo, ProviderId};
pub use request::{GenerationParams, GenerationRequest};
pub use result::{Content, GenerationResult, Outcome};
pub use task::{ProviderResponse, TaskHandle, TaskStatus};
