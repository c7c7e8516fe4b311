//! Built-in model catalog
//!
//! Descriptors are created once per process and never change afterwards.
//! The free functions here are the discovery helpers; they never perform I/O.

use crate::types::{Modality, ModelDescriptor, ModelInfo, ProviderId};

lazy_static::lazy_static! {
    /// Every model the stock adapters serve, in display order.
    pub static ref CATALOG: Vec<ModelDescriptor> = vec![
        // Images
        ModelDescriptor::new("gpt-image-1", "GPT Image 1", ProviderId::OpenAi, Modality::Image)
            .with_max_prompt_length(4000)
            .with_description("OpenAI image generation, answered synchronously"),
        ModelDescriptor::new("dall-e-3", "DALL·E 3", ProviderId::OpenAi, Modality::Image)
            .with_max_prompt_length(4000)
            .with_description("OpenAI DALL·E 3"),
        ModelDescriptor::new("midjourney", "Midjourney", ProviderId::Midjourney, Modality::Image)
            .with_reference_images(true)
            .with_max_prompt_length(1500)
            .with_description("Midjourney imagine through a midjourney-proxy endpoint"),
        ModelDescriptor::new("flux-pro-1.1", "FLUX 1.1 [pro]", ProviderId::Flux, Modality::Image)
            .with_reference_images(true)
            .with_max_prompt_length(2000)
            .with_description("Black Forest Labs FLUX 1.1 pro"),
        ModelDescriptor::new("flux-kontext-pro", "FLUX.1 Kontext [pro]", ProviderId::Flux, Modality::Image)
            .with_reference_images(true)
            .with_max_prompt_length(2000)
            .with_description("FLUX Kontext image editing from a reference image"),
        // Videos
        ModelDescriptor::new("MiniMax-Hailuo-02", "Hailuo 02", ProviderId::Minimaxi, Modality::Video)
            .with_reference_images(true)
            .with_max_prompt_length(2000)
            .with_description("MiniMaxi Hailuo 02, 768P/1080P, 6 or 10 seconds"),
        ModelDescriptor::new("T2V-01", "Hailuo T2V-01", ProviderId::Minimaxi, Modality::Video)
            .with_max_prompt_length(2000)
            .with_description("MiniMaxi text-to-video, 720P"),
        ModelDescriptor::new("sora-2", "Sora 2", ProviderId::Relay, Modality::Video)
            .with_reference_images(true)
            .with_max_prompt_length(1000)
            .with_description("Sora 2 through an OpenAI-compatible video relay"),
        ModelDescriptor::new("veo-3", "Veo 3", ProviderId::Relay, Modality::Video)
            .with_reference_images(true)
            .with_max_prompt_length(1000)
            .with_description("Veo 3 through an OpenAI-compatible video relay"),
        ModelDescriptor::new("wan2.2-t2v-plus", "Wan 2.2 T2V Plus", ProviderId::DashScope, Modality::Video)
            .with_max_prompt_length(800)
            .with_description("Alibaba Wan 2.2 text-to-video"),
        ModelDescriptor::new("wan2.2-i2v-plus", "Wan 2.2 I2V Plus", ProviderId::DashScope, Modality::Video)
            .with_reference_images(true)
            .with_max_prompt_length(800)
            .with_description("Alibaba Wan 2.2 image-to-video"),
        // Text
        ModelDescriptor::new("gpt-4o-mini", "GPT-4o mini", ProviderId::OpenAi, Modality::Text)
            .with_reference_images(true)
            .with_max_prompt_length(4000)
            .with_description("OpenAI chat completions"),
    ];
}

/// All catalog models.
pub fn models() -> &'static [ModelDescriptor] {
    &CATALOG
}

/// Catalog models producing `modality`.
pub fn models_for(modality: Modality) -> Vec<&'static ModelDescriptor> {
    CATALOG.iter().filter(|m| m.modality == modality).collect()
}

/// Descriptor by id.
pub fn model(id: &str) -> Option<&'static ModelDescriptor> {
    CATALOG.iter().find(|m| m.id == id)
}

pub fn model_info(id: &str) -> Option<ModelInfo> {
    model(id).map(ModelDescriptor::info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = models().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), models().len());
    }

    #[test]
    fn test_every_modality_is_served() {
        for modality in Modality::ALL {
            assert!(!models_for(modality).is_empty(), "{modality} has no models");
        }
        assert!(models_for(Modality::Text).iter().all(|m| m.modality == Modality::Text));
    }

    #[test]
    fn test_lookup() {
        let info = model_info("flux-pro-1.1").unwrap();
        assert_eq!(info.provider, ProviderId::Flux);
        assert_eq!(info.modality, Modality::Image);
        assert!(model("nope").is_none());
        assert!(model_info("nope").is_none());
    }
}
