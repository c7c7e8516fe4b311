//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use unigen::config::Credentials;
use unigen::prelude::*;
use unigen::{ModelRegistry, ProviderResponse};

pub const FAKE_KEY: &str = "fake-key-0123456789";
pub const FAKE_BASE_URL: &str = "https://api.example.com";

/// Adapter answering from a script of statuses.
///
/// Once the script runs out every further poll answers `fallback`. Terminal
/// answers carry `payload`, non-terminal ones an empty object.
pub struct FakeAdapter {
    provider: ProviderId,
    modality: Modality,
    max_prompt_length: usize,
    script: Mutex<VecDeque<TaskStatus>>,
    fallback: TaskStatus,
    payload: Value,
    submits: AtomicUsize,
    polls: AtomicUsize,
}

impl FakeAdapter {
    pub fn new(modality: Modality) -> Self {
        Self {
            provider: ProviderId::Relay,
            modality,
            max_prompt_length: 1000,
            script: Mutex::new(VecDeque::new()),
            fallback: TaskStatus::Succeeded,
            payload: json!({"url": "/img/123.png"}),
            submits: AtomicUsize::new(0),
            polls: AtomicUsize::new(0),
        }
    }

    /// `pending` non-terminal polls, then `terminal`.
    pub fn after(mut self, pending: usize, terminal: TaskStatus) -> Self {
        self.script = Mutex::new(std::iter::repeat_n(TaskStatus::Running, pending).collect());
        self.fallback = terminal;
        self
    }

    pub fn never_finishing(mut self) -> Self {
        self.fallback = TaskStatus::Running;
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_max_prompt_length(mut self, max: usize) -> Self {
        self.max_prompt_length = max;
        self
    }

    pub fn submits(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderAdapter for FakeAdapter {
    fn id(&self) -> ProviderId {
        self.provider
    }

    fn modality(&self) -> Modality {
        self.modality
    }

    fn default_base_url(&self) -> &str {
        FAKE_BASE_URL
    }

    fn max_prompt_length(&self) -> usize {
        self.max_prompt_length
    }

    fn validate_key(&self, key: &str) -> bool {
        key.starts_with("fake-") && key.len() >= 16
    }

    async fn submit(
        &self,
        _request: &GenerationRequest,
        model: &ModelDescriptor,
        _credentials: &Credentials,
    ) -> unigen::Result<TaskHandle> {
        let n = self.submits.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TaskHandle::new(format!("fake-task-{n}"), &model.id))
    }

    async fn poll(
        &self,
        _handle: &TaskHandle,
        _credentials: &Credentials,
    ) -> unigen::Result<ProviderResponse> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let status = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback);
        let payload = if status.is_terminal() {
            self.payload.clone()
        } else {
            json!({})
        };
        Ok(ProviderResponse::new(status, payload))
    }
}

pub fn descriptor(id: &str, modality: Modality) -> ModelDescriptor {
    ModelDescriptor::new(id, id, ProviderId::Relay, modality)
        .with_reference_images(modality != Modality::Image)
        .with_max_prompt_length(1000)
}

pub fn config() -> StaticConfig {
    StaticConfig::new().with_api_key(ProviderId::Relay, FAKE_KEY)
}

/// Orchestrator serving `adapters` under the given model ids.
pub fn orchestrator(
    adapters: Vec<(&str, Arc<FakeAdapter>)>,
    resolver: StaticConfig,
    policy: PollPolicy,
) -> TaskOrchestrator {
    let mut registry = ModelRegistry::new();
    for (id, adapter) in adapters {
        registry
            .register(descriptor(id, adapter.modality()), adapter)
            .unwrap();
    }
    TaskOrchestrator::builder()
        .resolver(resolver)
        .registry(registry)
        .poll_policy(policy)
        .build()
        .unwrap()
}

pub fn fast_policy(max_attempts: u32) -> PollPolicy {
    PollPolicy::new(Duration::from_millis(10), max_attempts)
}

/// Settings pointing `provider` at a mock server.
pub fn mock_config(provider: ProviderId, key: &str, base_url: &str) -> StaticConfig {
    StaticConfig::new()
        .with_api_key(provider, key)
        .with_base_url(provider, base_url)
}

/// Stock orchestrator with a short poll interval.
pub fn stock_orchestrator(resolver: StaticConfig, max_attempts: u32) -> TaskOrchestrator {
    TaskOrchestrator::builder()
        .resolver(resolver)
        .poll_policy(fast_policy(max_attempts))
        .build()
        .unwrap()
}
