//! Utility modules for unigen
//!
//! Small helpers shared by adapters, the normalizer and the orchestrator.

pub mod cancel;
pub mod json;
pub mod url;

pub use cancel::CancelHandle;
pub use url::*;
