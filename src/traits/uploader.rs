//! Reference image upload capability

use async_trait::async_trait;

use crate::error::GenError;
use crate::types::{Credential, ReferenceImage, UploadedImage};

/// Uploads a reference image and returns the provider-side URI.
///
/// Implementations own object-storage signing; errors returned here are
/// wrapped as [`GenError::ReferenceUploadFailed`] by the pipeline.
#[async_trait]
pub trait ReferenceUploader: Send + Sync {
    async fn upload(
        &self,
        credential: &Credential,
        image: &ReferenceImage,
    ) -> Result<UploadedImage, GenError>;
}
