//! Generation request types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use super::credential::Credential;
use crate::error::GenError;
use crate::model_constants;

/// Source of a reference image for blend generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceImage {
    /// Remote image fetched by the uploader
    Url(String),
    /// Local file path
    Path(PathBuf),
    /// Raw image bytes
    Bytes(Vec<u8>),
}

/// Result of a successful reference upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    /// Provider storage URI referenced from the blend ability
    pub image_uri: String,
}

/// One image-generation call.
///
/// Immutable once built; construct it through [`GenerationRequest::builder`].
#[derive(Debug, Clone, Validate)]
pub struct GenerationRequest {
    /// Public model name (e.g. `jimeng-4.0`)
    model: String,
    #[validate(length(min = 1, message = "prompt must not be empty"))]
    prompt: String,
    negative_prompt: String,
    /// Caller ratio hint (`W:H`)
    ratio: Option<String>,
    /// Caller tier hint (`1k` / `2k`)
    resolution: Option<String>,
    #[validate(range(min = 0.0, max = 1.0))]
    sample_strength: f64,
    reference_image: Option<ReferenceImage>,
    credential: Credential,
}

impl GenerationRequest {
    pub const DEFAULT_SAMPLE_STRENGTH: f64 = 0.5;

    /// Start building a request for `prompt`, authenticated by `credential`.
    pub fn builder(
        prompt: impl Into<String>,
        credential: Credential,
    ) -> GenerationRequestBuilder {
        GenerationRequestBuilder::new(prompt, credential)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn negative_prompt(&self) -> &str {
        &self.negative_prompt
    }

    pub fn ratio_hint(&self) -> Option<&str> {
        self.ratio.as_deref()
    }

    pub fn resolution_hint(&self) -> Option<&str> {
        self.resolution.as_deref()
    }

    pub fn sample_strength(&self) -> f64 {
        self.sample_strength
    }

    pub fn reference_image(&self) -> Option<&ReferenceImage> {
        self.reference_image.as_ref()
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Validate request parameters
    pub fn validate_params(&self) -> Result<(), GenError> {
        self.validate()?;
        if self.credential.is_empty() {
            return Err(GenError::InvalidParameter(
                "credential must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`GenerationRequest`].
#[derive(Debug, Clone)]
pub struct GenerationRequestBuilder {
    request: GenerationRequest,
}

impl GenerationRequestBuilder {
    pub fn new(prompt: impl Into<String>, credential: Credential) -> Self {
        Self {
            request: GenerationRequest {
                model: model_constants::DEFAULT_MODEL.to_string(),
                prompt: prompt.into(),
                negative_prompt: String::new(),
                ratio: None,
                resolution: None,
                sample_strength: GenerationRequest::DEFAULT_SAMPLE_STRENGTH,
                reference_image: None,
                credential,
            },
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.request.model = model.into();
        self
    }

    pub fn negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.request.negative_prompt = negative_prompt.into();
        self
    }

    pub fn ratio(mut self, ratio: impl Into<String>) -> Self {
        self.request.ratio = Some(ratio.into());
        self
    }

    pub fn resolution(mut self, resolution: impl Into<String>) -> Self {
        self.request.resolution = Some(resolution.into());
        self
    }

    pub fn sample_strength(mut self, strength: f64) -> Self {
        self.request.sample_strength = strength;
        self
    }

    pub fn reference_image(mut self, image: ReferenceImage) -> Self {
        self.request.reference_image = Some(image);
        self
    }

    /// Validate and finish the request.
    pub fn build(self) -> Result<GenerationRequest, GenError> {
        self.request.validate_params()?;
        Ok(self.request)
    }
}
