//! Cancellation utilities
//!
//! Provides a cancellation handle for long-running poll loops.

use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::error::{GenerationError, Result};

/// A handle that can be used to request cancellation.
///
/// Cloning shares the underlying token. [`CancelHandle::child`] derives a
/// handle that is cancelled with its parent but can also be cancelled alone,
/// which is how a composite workflow stops every sibling at once.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Create a new cancel handle.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Request cancellation. Poll loops observing this handle stop before
    /// their next poll, or immediately if they are sleeping.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A future that resolves when cancellation is requested.
    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// A handle cancelled together with this one.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Run `future` unless cancellation wins first.
    pub async fn run<F, T>(&self, future: F) -> Result<T>
    where
        F: Future<Output = T>,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(GenerationError::Cancelled),
            value = future => Ok(value),
        }
    }
}
