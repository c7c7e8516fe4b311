//! Configuration Resolver
//!
//! The orchestrator never reads process-wide state. It asks an injected
//! [`ConfigResolver`] for the API key, base URL and active model before
//! every submit and every poll, so a credential change is visible on the
//! very next call.

mod env;
mod poll;
mod static_config;

pub use env::EnvConfig;
pub use poll::PollPolicy;
pub use static_config::{ProviderSettings, StaticConfig};

use secrecy::{ExposeSecret, SecretString};

use crate::error::{GenerationError, Result};
use crate::types::{Modality, ProviderId};

/// Source of credentials and provider selection.
///
/// Implementations must be cheap to call; results are never cached by the
/// orchestrator.
pub trait ConfigResolver: Send + Sync {
    /// API key for `provider`, if one is configured.
    fn api_key(&self, provider: ProviderId) -> Option<SecretString>;

    /// Base URL override for `provider`; `None` means the adapter default.
    fn base_url(&self, provider: ProviderId) -> Option<String>;

    /// Model id to use when a request does not name one.
    fn provider(&self, modality: Modality) -> Option<String>;
}

/// Credentials handed to an adapter for exactly one call.
pub struct Credentials {
    pub api_key: SecretString,
    pub base_url: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn expose_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "api_key",
                &crate::observability::mask_secret(self.api_key.expose_secret()),
            )
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Snapshot the credentials for one call.
///
/// A missing or blank key is a validation failure: nothing can be sent.
pub fn resolve_credentials(
    resolver: &dyn ConfigResolver,
    provider: ProviderId,
    default_base_url: &str,
) -> Result<Credentials> {
    let key = resolver
        .api_key(provider)
        .filter(|k| !k.expose_secret().trim().is_empty())
        .ok_or_else(|| {
            GenerationError::validation(format!("no API key configured for {provider}"))
        })?;
    let base_url = resolver
        .base_url(provider)
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| default_base_url.to_string());
    Ok(Credentials {
        api_key: key,
        base_url: base_url.trim().trim_end_matches('/').to_string(),
    })
}
