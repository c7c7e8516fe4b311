//! In-memory configuration

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::ConfigResolver;
use crate::error::{GenerationError, Result};
use crate::types::{Modality, ProviderId};

/// Per-provider settings as they appear in a JSON config document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StaticConfigDocument {
    #[serde(default)]
    providers: HashMap<ProviderId, ProviderSettings>,
    #[serde(default)]
    models: HashMap<Modality, String>,
}

/// Configuration held in memory.
///
/// Values can be replaced at runtime (`set_*`), which is how an
/// application reflects a settings change without rebuilding the
/// orchestrator.
#[derive(Debug, Default)]
pub struct StaticConfig {
    keys: RwLock<HashMap<ProviderId, SecretString>>,
    base_urls: RwLock<HashMap<ProviderId, String>>,
    models: RwLock<HashMap<Modality, String>>,
}

impl StaticConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document of the form
    ///
    /// ```json
    /// {
    ///   "providers": { "flux": { "api_key": "...", "base_url": "..." } },
    ///   "models": { "image": "flux-pro-1.1" }
    /// }
    /// ```
    pub fn from_json(text: &str) -> Result<Self> {
        let doc: StaticConfigDocument = serde_json::from_str(text)
            .map_err(|e| GenerationError::Configuration(format!("invalid config: {e}")))?;
        let config = Self::new();
        for (provider, settings) in doc.providers {
            if let Some(key) = settings.api_key {
                config.set_api_key(provider, key);
            }
            if let Some(url) = settings.base_url {
                config.set_base_url(provider, url);
            }
        }
        for (modality, model) in doc.models {
            config.set_model(modality, model);
        }
        Ok(config)
    }

    pub fn with_api_key(self, provider: ProviderId, key: impl Into<String>) -> Self {
        self.set_api_key(provider, key);
        self
    }

    pub fn with_base_url(self, provider: ProviderId, url: impl Into<String>) -> Self {
        self.set_base_url(provider, url);
        self
    }

    pub fn with_model(self, modality: Modality, model: impl Into<String>) -> Self {
        self.set_model(modality, model);
        self
    }

    pub fn set_api_key(&self, provider: ProviderId, key: impl Into<String>) {
        self.keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(provider, SecretString::from(key.into()));
    }

    pub fn set_base_url(&self, provider: ProviderId, url: impl Into<String>) {
        self.base_urls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(provider, url.into());
    }

    pub fn set_model(&self, modality: Modality, model: impl Into<String>) {
        self.models
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(modality, model.into());
    }
}

impl ConfigResolver for StaticConfig {
    fn api_key(&self, provider: ProviderId) -> Option<SecretString> {
        self.keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&provider)
            .map(|k| SecretString::from(k.expose_secret().to_string()))
    }

    fn base_url(&self, provider: ProviderId) -> Option<String> {
        self.base_urls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&provider)
            .cloned()
    }

    fn provider(&self, modality: Modality) -> Option<String> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&modality)
            .cloned()
    }
}
