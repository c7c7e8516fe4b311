//! Generation request types
//!
//! A request carries the fields every modality shares plus exactly one
//! modality-specific parameter set.

use serde::{Deserialize, Serialize};

use super::model::Modality;
use super::task::TaskHandle;

/// Modality-specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "modality", rename_all = "lowercase")]
pub enum GenerationParams {
    Image {
        /// Target size such as "1024x1024"
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<String>,
        /// Aspect ratio such as "16:9"
        #[serde(default, skip_serializing_if = "Option::is_none")]
        aspect_ratio: Option<String>,
    },
    Video {
        /// Duration in seconds
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<u32>,
        /// Resolution such as "720P" or "1280x720"
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resolution: Option<String>,
        /// Free-form style hint
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        aspect_ratio: Option<String>,
    },
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_tokens: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        temperature: Option<f32>,
        /// Nucleus sampling
        #[serde(default, skip_serializing_if = "Option::is_none")]
        top_p: Option<f32>,
    },
}

impl GenerationParams {
    pub fn modality(&self) -> Modality {
        match self {
            GenerationParams::Image { .. } => Modality::Image,
            GenerationParams::Video { .. } => Modality::Video,
            GenerationParams::Text { .. } => Modality::Text,
        }
    }

    fn empty(modality: Modality) -> Self {
        match modality {
            Modality::Image => GenerationParams::Image {
                size: None,
                aspect_ratio: None,
            },
            Modality::Video => GenerationParams::Video {
                duration: None,
                resolution: None,
                style: None,
                aspect_ratio: None,
            },
            Modality::Text => GenerationParams::Text {
                max_tokens: None,
                temperature: None,
                top_p: None,
            },
        }
    }
}

/// A request for one generation.
///
/// Build one with [`GenerationRequest::image`], [`GenerationRequest::video`]
/// or [`GenerationRequest::text`], then pass it to
/// [`TaskOrchestrator::create_task`](crate::TaskOrchestrator::create_task).
/// To poll an in-flight job, attach the returned handle with
/// [`GenerationRequest::with_task`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model descriptor id; `None` uses the resolver's active selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Text description of the desired output
    pub prompt: String,

    /// Reference image URLs (or data URIs)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_images: Vec<String>,

    /// Handle of an in-flight job, used for polling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskHandle>,

    pub params: GenerationParams,
}

impl GenerationRequest {
    fn new(model: Option<String>, prompt: impl Into<String>, modality: Modality) -> Self {
        Self {
            model,
            prompt: prompt.into(),
            reference_images: Vec::new(),
            task: None,
            params: GenerationParams::empty(modality),
        }
    }

    /// Create an image request for `model`.
    ///
    /// ```ignore
    /// let request = GenerationRequest::image("flux-pro-1.1", "a red bicycle")
    ///     .with_aspect_ratio("1:1");
    /// ```
    pub fn image(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(Some(model.into()), prompt, Modality::Image)
    }

    pub fn video(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(Some(model.into()), prompt, Modality::Video)
    }

    pub fn text(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(Some(model.into()), prompt, Modality::Text)
    }

    /// Create a request without a model; the configuration resolver picks one.
    pub fn for_modality(modality: Modality, prompt: impl Into<String>) -> Self {
        Self::new(None, prompt, modality)
    }

    pub fn modality(&self) -> Modality {
        self.params.modality()
    }

    /// Add a reference image
    pub fn with_reference_image(mut self, url: impl Into<String>) -> Self {
        self.reference_images.push(url.into());
        self
    }

    /// Attach the handle of an in-flight job
    pub fn with_task(mut self, handle: TaskHandle) -> Self {
        self.task = Some(handle);
        self
    }

    /// Set image size (ignored for other modalities)
    pub fn with_size(mut self, value: impl Into<String>) -> Self {
        if let GenerationParams::Image { size, .. } = &mut self.params {
            *size = Some(value.into());
        }
        self
    }

    /// Set aspect ratio (image and video)
    pub fn with_aspect_ratio(mut self, value: impl Into<String>) -> Self {
        match &mut self.params {
            GenerationParams::Image { aspect_ratio, .. }
            | GenerationParams::Video { aspect_ratio, .. } => *aspect_ratio = Some(value.into()),
            GenerationParams::Text { .. } => {}
        }
        self
    }

    /// Set video duration in seconds
    pub fn with_duration(mut self, seconds: u32) -> Self {
        if let GenerationParams::Video { duration, .. } = &mut self.params {
            *duration = Some(seconds);
        }
        self
    }

    /// Set video resolution
    pub fn with_resolution(mut self, value: impl Into<String>) -> Self {
        if let GenerationParams::Video { resolution, .. } = &mut self.params {
            *resolution = Some(value.into());
        }
        self
    }

    /// Set video style
    pub fn with_style(mut self, value: impl Into<String>) -> Self {
        if let GenerationParams::Video { style, .. } = &mut self.params {
            *style = Some(value.into());
        }
        self
    }

    pub fn with_max_tokens(mut self, value: u32) -> Self {
        if let GenerationParams::Text { max_tokens, .. } = &mut self.params {
            *max_tokens = Some(value);
        }
        self
    }

    pub fn with_temperature(mut self, value: f32) -> Self {
        if let GenerationParams::Text { temperature, .. } = &mut self.params {
            *temperature = Some(value);
        }
        self
    }

    pub fn with_top_p(mut self, value: f32) -> Self {
        if let GenerationParams::Text { top_p, .. } = &mut self.params {
            *top_p = Some(value);
        }
        self
    }
}
