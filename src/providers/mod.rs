//! Provider Adapters
//!
//! One adapter per provider/modality combination. Every adapter speaks its
//! provider's wire protocol and exposes the same single-shot capability set:
//! key and prompt validation (local only), `submit`, and `poll`.
//!
//! Adapters never loop. The submit → poll → timeout state machine lives in
//! [`crate::orchestrator`], and each adapter's status translation function is
//! the only place a provider status string is interpreted.

use async_trait::async_trait;

use crate::config::Credentials;
use crate::error::Result;
use crate::types::{
    GenerationRequest, Modality, ModelDescriptor, ProviderId, ProviderResponse, TaskHandle,
};

pub(crate) mod http;

pub mod dashscope;
pub mod flux;
pub mod midjourney;
pub mod minimaxi;
pub mod openai;
pub mod relay;

pub use dashscope::DashScopeVideo;
pub use flux::Flux;
pub use midjourney::Midjourney;
pub use minimaxi::MinimaxiVideo;
pub use openai::{OpenAiChat, OpenAiImages};
pub use relay::RelayVideo;

/// Uniform capability set of a provider adapter.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider this adapter talks to
    fn id(&self) -> ProviderId;

    /// Content kind this adapter produces
    fn modality(&self) -> Modality;

    /// Base URL used when the configuration resolver supplies none
    fn default_base_url(&self) -> &str;

    /// Documented maximum prompt length in characters
    fn max_prompt_length(&self) -> usize;

    /// Syntactic key check. Never performs I/O.
    fn validate_key(&self, key: &str) -> bool;

    /// Non-empty after trimming and no longer than the provider maximum.
    fn validate_prompt(&self, prompt: &str) -> bool {
        !prompt.trim().is_empty() && prompt.chars().count() <= self.max_prompt_length()
    }

    /// Provider-specific parameter rules (durations, resolutions, ...).
    fn validate_params(&self, _request: &GenerationRequest, _model: &ModelDescriptor) -> Result<()> {
        Ok(())
    }

    /// Submit a job and return its handle.
    ///
    /// Synchronous providers finish the job here and return a handle that
    /// carries the terminal payload.
    async fn submit(
        &self,
        request: &GenerationRequest,
        model: &ModelDescriptor,
        credentials: &Credentials,
    ) -> Result<TaskHandle>;

    /// Query the job once. Must be safe to repeat and must not change
    /// provider-side state.
    async fn poll(&self, handle: &TaskHandle, credentials: &Credentials) -> Result<ProviderResponse>;
}

/// Shared key rule of providers issuing `sk-` keys.
pub(crate) fn is_sk_key(key: &str) -> bool {
    let key = key.trim();
    key.starts_with("sk-") && key.len() >= 20 && !key.contains(char::is_whitespace)
}

/// Key rule of providers without a documented prefix.
pub(crate) fn is_opaque_key(key: &str, min_len: usize) -> bool {
    let key = key.trim();
    key.len() >= min_len && !key.contains(char::is_whitespace)
}
