//! Concurrent generation of several requests

use futures::future::join_all;

use super::TaskOrchestrator;
use crate::error::Result;
use crate::types::{GenerationRequest, GenerationResult};
use crate::utils::CancelHandle;

/// What a failed member of [`TaskOrchestrator::generate_all`] does to the
/// others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Every request runs to its own end.
    #[default]
    Independent,
    /// The first failed result or error cancels every sibling still running;
    /// those siblings yield [`crate::GenerationError::Cancelled`].
    CancelSiblings,
}

impl TaskOrchestrator {
    /// Run all `requests` concurrently. Results keep the input order.
    pub async fn generate_all(
        &self,
        requests: Vec<GenerationRequest>,
        policy: FailurePolicy,
    ) -> Vec<Result<GenerationResult>> {
        let group = CancelHandle::new();
        let runs = requests.into_iter().map(|request| {
            let cancel = group.child();
            let group = group.clone();
            async move {
                let outcome = self.generate_inner(&request, Some(&cancel)).await;
                let failed = match &outcome {
                    Ok(result) => !result.is_success(),
                    Err(_) => true,
                };
                if failed && policy == FailurePolicy::CancelSiblings && !group.is_cancelled() {
                    tracing::info!(
                        model = request.model.as_deref().unwrap_or_default(),
                        "member failed; cancelling siblings"
                    );
                    group.cancel();
                }
                outcome
            }
        });
        join_all(runs).await
    }
}
