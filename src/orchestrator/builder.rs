//! Builder for [`TaskOrchestrator`]

use std::sync::Arc;

use super::TaskOrchestrator;
use crate::config::{ConfigResolver, PollPolicy};
use crate::error::{GenerationError, Result};
use crate::registry::ModelRegistry;

/// Assembles an orchestrator from a resolver, an optional custom registry
/// and an optional poll policy.
///
/// ```rust,no_run
/// use unigen::prelude::*;
///
/// let orchestrator = TaskOrchestrator::builder()
///     .resolver(EnvConfig::new())
///     .build()?;
/// # Ok::<(), unigen::GenerationError>(())
/// ```
#[derive(Default)]
pub struct TaskOrchestratorBuilder {
    registry: Option<ModelRegistry>,
    resolver: Option<Arc<dyn ConfigResolver>>,
    poll_policy: Option<PollPolicy>,
    http_client: Option<reqwest::Client>,
}

impl TaskOrchestratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolver(mut self, resolver: impl ConfigResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Share a resolver with other components.
    pub fn shared_resolver(mut self, resolver: Arc<dyn ConfigResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Replace the stock registry, e.g. to register extra adapters.
    pub fn registry(mut self, registry: ModelRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// HTTP client handed to the stock adapters. Ignored with a custom
    /// registry.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Override the poll cadence. Applies to every provider alike.
    pub fn poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll_policy = Some(policy);
        self
    }

    pub fn build(self) -> Result<TaskOrchestrator> {
        let resolver = self.resolver.ok_or_else(|| {
            GenerationError::Configuration("a configuration resolver is required".to_string())
        })?;
        let registry = match self.registry {
            Some(registry) => registry,
            None => ModelRegistry::with_defaults(
                self.http_client
                    .unwrap_or_else(crate::providers::http::default_http_client),
            ),
        };
        Ok(TaskOrchestrator {
            registry: Arc::new(registry),
            resolver,
            poll_policy: self.poll_policy.unwrap_or_default(),
        })
    }
}
