//! Model descriptors and provider identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Content kind a provider produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Image,
    Video,
    Text,
}

impl Modality {
    pub const ALL: [Modality; 3] = [Modality::Image, Modality::Video, Modality::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Image => "image",
            Modality::Video => "video",
            Modality::Text => "text",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Third-party services the crate knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAi,
    Midjourney,
    Flux,
    Minimaxi,
    Relay,
    DashScope,
}

impl ProviderId {
    pub const ALL: [ProviderId; 6] = [
        ProviderId::OpenAi,
        ProviderId::Midjourney,
        ProviderId::Flux,
        ProviderId::Minimaxi,
        ProviderId::Relay,
        ProviderId::DashScope,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai",
            ProviderId::Midjourney => "midjourney",
            ProviderId::Flux => "flux",
            ProviderId::Minimaxi => "minimaxi",
            ProviderId::Relay => "relay",
            ProviderId::DashScope => "dashscope",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        ProviderId::ALL
            .into_iter()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| format!("unknown provider '{s}'"))
    }
}

/// Capability flags attached to a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCapabilities {
    /// Whether reference images may be attached to the request
    pub accepts_reference_images: bool,
    /// Maximum prompt length in characters
    pub max_prompt_length: usize,
}

/// Identifies one provider + modality pair.
///
/// Descriptors are defined once at process start (see
/// [`crate::registry::catalog`]) and looked up by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub display_name: String,
    pub provider: ProviderId,
    pub modality: Modality,
    pub capabilities: ModelCapabilities,
    #[serde(default)]
    pub description: String,
}

impl ModelDescriptor {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        provider: ProviderId,
        modality: Modality,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            provider,
            modality,
            capabilities: ModelCapabilities {
                accepts_reference_images: false,
                max_prompt_length: usize::MAX,
            },
            description: String::new(),
        }
    }

    pub fn with_reference_images(mut self, accepted: bool) -> Self {
        self.capabilities.accepts_reference_images = accepted;
        self
    }

    pub fn with_max_prompt_length(mut self, max: usize) -> Self {
        self.capabilities.max_prompt_length = max;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Display metadata for pickers and listings.
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            provider: self.provider,
            modality: self.modality,
            description: self.description.clone(),
        }
    }
}

/// Read-only display metadata of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub display_name: String,
    pub provider: ProviderId,
    pub modality: Modality,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_round_trips_through_str() {
        for provider in ProviderId::ALL {
            assert_eq!(provider.as_str().parse::<ProviderId>(), Ok(provider));
        }
        assert_eq!("  DashScope ".parse::<ProviderId>(), Ok(ProviderId::DashScope));
        assert!("nope".parse::<ProviderId>().is_err());
    }

    #[test]
    fn test_provider_id_serde_matches_as_str() {
        let json = serde_json::to_string(&ProviderId::OpenAi).unwrap();
        assert_eq!(json, "\"openai\"");
        let json = serde_json::to_string(&ProviderId::DashScope).unwrap();
        assert_eq!(json, "\"dashscope\"");
    }

    #[test]
    fn test_descriptor_builder() {
        let d = ModelDescriptor::new("m", "M", ProviderId::Flux, Modality::Image)
            .with_reference_images(true)
            .with_max_prompt_length(1000)
            .with_description("test model");
        assert!(d.capabilities.accepts_reference_images);
        assert_eq!(d.capabilities.max_prompt_length, 1000);
        let info = d.info();
        assert_eq!(info.id, "m");
        assert_eq!(info.modality, Modality::Image);
        assert_eq!(info.description, "test model");
    }
}
