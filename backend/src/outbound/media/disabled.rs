//! Image host used when uploads are not configured.

use async_trait::async_trait;

use crate::domain::ports::{HostedImage, ImageHost, ImageHostError, ImageUpload};

/// Rejects every upload so nothing is persisted with a dangling image.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledImageHost;

#[async_trait]
impl ImageHost for DisabledImageHost {
    async fn upload(&self, _upload: &ImageUpload) -> Result<HostedImage, ImageHostError> {
        Err(ImageHostError::transport("image host is not configured"))
    }
}
