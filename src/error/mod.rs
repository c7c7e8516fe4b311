//! Error Handling Module
//!
//! This module provides the error taxonomy for generation tasks:
//! - Core error type (`GenerationError`) and its coarse `ErrorKind`
//! - HTTP status classification shared by every provider adapter
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust,ignore
//! use unigen::error::{GenerationError, ErrorKind};
//!
//! let error = GenerationError::validation("prompt must not be empty");
//! assert_eq!(error.kind(), ErrorKind::Validation);
//! assert!(!error.is_retryable());
//! ```

// Module declarations
mod conversions;
pub mod types;

// Re-exports for public API
pub use types::*;

pub(crate) use conversions::transport_error;
