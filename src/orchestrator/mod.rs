//! Task Orchestrator
//!
//! Drives a generation through `Validating → Submitting → Polling → Done`.
//! Adapters are single-shot; the only polling loop in the crate lives here
//! and applies the same [`PollPolicy`] to every provider.
//!
//! Provider-reported failures and timeouts come back as `Ok` results with a
//! `Failed` status. `Err` is reserved for validation failures, transport and
//! protocol errors, and cancellation.

mod batch;
mod builder;

pub use batch::FailurePolicy;
pub use builder::TaskOrchestratorBuilder;

use std::sync::Arc;

use tracing::Instrument;

use crate::config::{ConfigResolver, Credentials, PollPolicy, resolve_credentials};
use crate::error::{GenerationError, Result};
use crate::normalize::normalize;
use crate::registry::{ModelRegistry, RegistryEntry};
use crate::types::{
    GenerationRequest, GenerationResult, Modality, ModelDescriptor, ModelInfo, TaskHandle,
};
use crate::utils::CancelHandle;

/// Entry point for callers: validates, submits and polls generation tasks.
///
/// Cloning is cheap; clones share the registry and the resolver.
#[derive(Clone)]
pub struct TaskOrchestrator {
    registry: Arc<ModelRegistry>,
    resolver: Arc<dyn ConfigResolver>,
    poll_policy: PollPolicy,
}

/// Name used by callers that think of the orchestrator as a service.
pub type ModelService = TaskOrchestrator;

static_assertions::assert_impl_all!(TaskOrchestrator: Send, Sync, Clone);

impl std::fmt::Debug for TaskOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskOrchestrator")
            .field("models", &self.registry.len())
            .field("poll_policy", &self.poll_policy)
            .finish()
    }
}

impl TaskOrchestrator {
    /// Orchestrator over the stock adapters with the default poll policy.
    pub fn new(resolver: impl ConfigResolver + 'static) -> Self {
        Self {
            registry: Arc::new(ModelRegistry::with_defaults(
                crate::providers::http::default_http_client(),
            )),
            resolver: Arc::new(resolver),
            poll_policy: PollPolicy::default(),
        }
    }

    pub fn builder() -> TaskOrchestratorBuilder {
        TaskOrchestratorBuilder::new()
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn poll_policy(&self) -> PollPolicy {
        self.poll_policy
    }

    pub fn models(&self) -> Vec<&ModelDescriptor> {
        self.registry.models()
    }

    pub fn models_for(&self, modality: Modality) -> Vec<&ModelDescriptor> {
        self.registry.models_for(modality)
    }

    pub fn model(&self, id: &str) -> Option<&ModelDescriptor> {
        self.registry.model(id)
    }

    pub fn model_info(&self, id: &str) -> Option<ModelInfo> {
        self.registry.model_info(id)
    }

    /// Validate `request` and submit it to its provider.
    ///
    /// Every validation failure is reported before the adapter is called.
    pub async fn create_task(&self, request: &GenerationRequest) -> Result<TaskHandle> {
        let model_id = self.model_id(request)?;
        let span = tracing::info_span!(
            "create_task",
            trace_id = %uuid::Uuid::new_v4(),
            model = %model_id,
        );
        async {
            let (entry, credentials) = self
                .validate(&model_id, request)
                .inspect_err(|e| tracing::info!(error = %e, "request rejected"))?;
            tracing::debug!(
                provider = %entry.descriptor.provider,
                credentials = ?credentials,
                "submitting"
            );
            let handle = entry
                .adapter
                .submit(request, &entry.descriptor, &credentials)
                .await
                .inspect_err(|e| tracing::warn!(error = %e, "submit failed"))?;
            tracing::info!(
                provider = %entry.descriptor.provider,
                task_id = %handle.task_id,
                "task submitted"
            );
            Ok(handle)
        }
        .instrument(span)
        .await
    }

    /// Poll the task in `request.task` until it is terminal or the poll
    /// budget runs out.
    pub async fn get_task_status(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        self.poll_task(request, None).await
    }

    /// [`Self::get_task_status`] that stops with
    /// [`GenerationError::Cancelled`] once `cancel` fires.
    pub async fn get_task_status_with_cancel(
        &self,
        request: &GenerationRequest,
        cancel: &CancelHandle,
    ) -> Result<GenerationResult> {
        self.poll_task(request, Some(cancel)).await
    }

    /// Submit and poll in one call.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        self.generate_inner(request, None).await
    }

    pub async fn generate_with_cancel(
        &self,
        request: &GenerationRequest,
        cancel: &CancelHandle,
    ) -> Result<GenerationResult> {
        self.generate_inner(request, Some(cancel)).await
    }

    async fn generate_inner(
        &self,
        request: &GenerationRequest,
        cancel: Option<&CancelHandle>,
    ) -> Result<GenerationResult> {
        let handle = match cancel {
            Some(cancel) => cancel.run(self.create_task(request)).await??,
            None => self.create_task(request).await?,
        };
        let request = request.clone().with_task(handle);
        self.poll_task(&request, cancel).await
    }

    /// Explicit model id, else the resolver's active model for the modality.
    fn model_id(&self, request: &GenerationRequest) -> Result<String> {
        if let Some(model) = request.model.as_deref().map(str::trim)
            && !model.is_empty()
        {
            return Ok(model.to_string());
        }
        let modality = request.modality();
        self.resolver
            .provider(modality)
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| GenerationError::validation(format!("no {modality} model selected")))
    }

    fn validate(
        &self,
        model_id: &str,
        request: &GenerationRequest,
    ) -> Result<(&RegistryEntry, Credentials)> {
        let entry = self.registry.resolve(model_id)?;
        let descriptor = &entry.descriptor;
        let adapter = &entry.adapter;

        if request.modality() != descriptor.modality {
            return Err(GenerationError::validation(format!(
                "{} produces {}, but the request carries {} parameters",
                descriptor.id,
                descriptor.modality,
                request.modality()
            )));
        }
        if !request.reference_images.is_empty() && !descriptor.capabilities.accepts_reference_images
        {
            return Err(GenerationError::validation(format!(
                "{} does not accept reference images",
                descriptor.id
            )));
        }

        let credentials =
            resolve_credentials(self.resolver.as_ref(), descriptor.provider, adapter.default_base_url())?;
        if !adapter.validate_key(credentials.expose_key()) {
            return Err(GenerationError::validation(format!(
                "API key for {} is malformed",
                descriptor.provider
            )));
        }

        let max = adapter
            .max_prompt_length()
            .min(descriptor.capabilities.max_prompt_length);
        let length = request.prompt.chars().count();
        if request.prompt.trim().is_empty() {
            return Err(GenerationError::validation("prompt is empty"));
        }
        if !adapter.validate_prompt(&request.prompt) || length > max {
            return Err(GenerationError::validation(format!(
                "prompt has {length} characters, {} accepts at most {max}",
                descriptor.id
            )));
        }

        adapter.validate_params(request, descriptor)?;
        Ok((entry, credentials))
    }

    async fn poll_task(
        &self,
        request: &GenerationRequest,
        cancel: Option<&CancelHandle>,
    ) -> Result<GenerationResult> {
        let handle = request
            .task
            .as_ref()
            .ok_or_else(|| GenerationError::validation("request carries no task handle"))?;
        let entry = self.registry.resolve(&handle.model)?;
        let span = tracing::info_span!(
            "get_task_status",
            trace_id = %uuid::Uuid::new_v4(),
            model = %handle.model,
            task_id = %handle.task_id,
        );
        self.poll_loop(entry, handle, cancel).instrument(span).await
    }

    async fn poll_loop(
        &self,
        entry: &RegistryEntry,
        handle: &TaskHandle,
        cancel: Option<&CancelHandle>,
    ) -> Result<GenerationResult> {
        let PollPolicy {
            interval,
            max_attempts,
        } = self.poll_policy;
        let provider = entry.descriptor.provider;

        for attempt in 1..=max_attempts {
            if cancel.is_some_and(CancelHandle::is_cancelled) {
                tracing::info!(attempt, "polling cancelled");
                return Err(GenerationError::Cancelled);
            }

            // Credentials are read again for every poll.
            let credentials = resolve_credentials(
                self.resolver.as_ref(),
                provider,
                entry.adapter.default_base_url(),
            )?;
            let poll = entry.adapter.poll(handle, &credentials);
            let response = match cancel {
                Some(cancel) => cancel.run(poll).await??,
                None => poll.await?,
            };
            tracing::debug!(attempt, status = %response.status, "polled");

            if response.status.is_terminal() {
                let result = normalize(
                    entry.descriptor.modality,
                    &response,
                    handle,
                    &credentials.base_url,
                );
                tracing::info!(attempt, status = %result.status(), "task finished");
                return Ok(result);
            }

            if attempt < max_attempts {
                match cancel {
                    Some(cancel) => cancel.run(tokio::time::sleep(interval)).await?,
                    None => tokio::time::sleep(interval).await,
                }
            }
        }

        tracing::warn!(attempts = max_attempts, "status query timed out");
        Ok(GenerationResult::failed(
            &handle.task_id,
            &handle.model,
            entry.descriptor.modality,
            GenerationResult::TIMED_OUT,
        ))
    }
}
