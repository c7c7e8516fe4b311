//! Model Registry
//!
//! Maps a model id to its descriptor and the adapter that serves it. The
//! orchestrator resolves both the submit path and the poll path through
//! here, so the adapter for a task is always derived from the model id the
//! handle carries.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{GenerationError, Result};
use crate::providers::{
    DashScopeVideo, Flux, Midjourney, MinimaxiVideo, OpenAiChat, OpenAiImages, ProviderAdapter,
    RelayVideo,
};
use crate::types::{Modality, ModelDescriptor, ModelInfo};

pub mod catalog;

/// A descriptor bound to the adapter serving it.
#[derive(Clone)]
pub struct RegistryEntry {
    pub descriptor: ModelDescriptor,
    pub adapter: Arc<dyn ProviderAdapter>,
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("descriptor", &self.descriptor)
            .field("adapter", &self.adapter.id())
            .finish()
    }
}

/// Model id → (descriptor, adapter).
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    by_id: HashMap<String, RegistryEntry>,
    /// Registration order, used for listings
    order: Vec<String>,
}

impl ModelRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry serving every [`catalog::CATALOG`] model with the stock
    /// adapters, all sharing `http_client`.
    pub fn with_defaults(http_client: reqwest::Client) -> Self {
        let adapters: Vec<Arc<dyn ProviderAdapter>> = vec![
            Arc::new(OpenAiImages::new(http_client.clone())),
            Arc::new(OpenAiChat::new(http_client.clone())),
            Arc::new(Midjourney::new(http_client.clone())),
            Arc::new(Flux::new(http_client.clone())),
            Arc::new(MinimaxiVideo::new(http_client.clone())),
            Arc::new(RelayVideo::new(http_client.clone())),
            Arc::new(DashScopeVideo::new(http_client)),
        ];

        let mut registry = Self::new();
        for descriptor in catalog::models() {
            let adapter = adapters
                .iter()
                .find(|a| a.id() == descriptor.provider && a.modality() == descriptor.modality);
            match adapter {
                Some(adapter) => registry.insert(descriptor.clone(), Arc::clone(adapter)),
                None => tracing::warn!(model = %descriptor.id, "no stock adapter for catalog model"),
            }
        }
        registry
    }

    /// Bind `descriptor` to `adapter`, replacing an earlier entry with the
    /// same id.
    pub fn register(
        &mut self,
        descriptor: ModelDescriptor,
        adapter: Arc<dyn ProviderAdapter>,
    ) -> Result<()> {
        if adapter.id() != descriptor.provider || adapter.modality() != descriptor.modality {
            return Err(GenerationError::Configuration(format!(
                "model '{}' is {} on {} but the adapter serves {} on {}",
                descriptor.id,
                descriptor.modality,
                descriptor.provider,
                adapter.modality(),
                adapter.id()
            )));
        }
        self.insert(descriptor, adapter);
        Ok(())
    }

    fn insert(&mut self, descriptor: ModelDescriptor, adapter: Arc<dyn ProviderAdapter>) {
        if !self.by_id.contains_key(&descriptor.id) {
            self.order.push(descriptor.id.clone());
        }
        self.by_id.insert(
            descriptor.id.clone(),
            RegistryEntry {
                descriptor,
                adapter,
            },
        );
    }

    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.by_id.get(id)
    }

    /// Entry for `id`, or [`GenerationError::UnknownModel`].
    pub fn resolve(&self, id: &str) -> Result<&RegistryEntry> {
        self.get(id)
            .ok_or_else(|| GenerationError::UnknownModel(id.to_string()))
    }

    pub fn models(&self) -> Vec<&ModelDescriptor> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id))
            .map(|e| &e.descriptor)
            .collect()
    }

    pub fn models_for(&self, modality: Modality) -> Vec<&ModelDescriptor> {
        self.models()
            .into_iter()
            .filter(|m| m.modality == modality)
            .collect()
    }

    pub fn model(&self, id: &str) -> Option<&ModelDescriptor> {
        self.get(id).map(|e| &e.descriptor)
    }

    pub fn model_info(&self, id: &str) -> Option<ModelInfo> {
        self.model(id).map(ModelDescriptor::info)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
