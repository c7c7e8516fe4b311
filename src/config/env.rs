//! Environment-backed configuration

use secrecy::SecretString;

use super::ConfigResolver;
use crate::types::{Modality, ProviderId};

/// Reads `<PREFIX>_<PROVIDER>_API_KEY`, `<PREFIX>_<PROVIDER>_BASE_URL` and
/// `<PREFIX>_<MODALITY>_MODEL` on every call.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    prefix: String,
}

impl EnvConfig {
    pub const DEFAULT_PREFIX: &'static str = "UNIGEN";

    pub fn new() -> Self {
        Self::with_prefix(Self::DEFAULT_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn var(&self, middle: &str, suffix: &str) -> Option<String> {
        let name = format!("{}_{}_{}", self.prefix, middle.to_ascii_uppercase(), suffix);
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigResolver for EnvConfig {
    fn api_key(&self, provider: ProviderId) -> Option<SecretString> {
        self.var(provider.as_str(), "API_KEY").map(SecretString::from)
    }

    fn base_url(&self, provider: ProviderId) -> Option<String> {
        self.var(provider.as_str(), "BASE_URL")
    }

    fn provider(&self, modality: Modality) -> Option<String> {
        self.var(modality.as_str(), "MODEL")
    }
}
