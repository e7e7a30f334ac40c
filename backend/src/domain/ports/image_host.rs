//! Port for the remote image host that stores product pictures.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image host adapters.
    pub enum ImageHostError {
        /// The request could not be sent or the connection dropped.
        Transport { message: String } => "image host transport failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } => "image host request timed out: {message}",
        /// The host answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "image host rejected upload with status {status}: {message}",
        /// The host response did not have the expected shape.
        Decode { message: String } => "image host response could not be decoded: {message}",
        /// The staged upload could not be read from disk.
        Io { message: String } => "staged upload could not be read: {message}",
    }
}

/// Kind of asset the host should store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResourceType {
    /// Raster image storage, with the host's image transformations.
    #[default]
    Image,
}

impl ResourceType {
    /// Path segment the host uses for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A staged file ready to be transferred to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Local path of the staged file.
    pub path: PathBuf,
    /// Name the client gave the file.
    pub file_name: String,
    /// Accepted image MIME type.
    pub content_type: String,
    /// Destination folder on the host.
    pub folder: String,
    /// Storage kind requested from the host.
    pub resource_type: ResourceType,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedImage {
    /// Durable HTTPS URL of the stored image.
    pub secure_url: String,
}

/// Port for transferring staged files to durable image storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload the staged file and return its durable URL.
    async fn upload(&self, upload: &ImageUpload) -> Result<HostedImage, ImageHostError>;
}

/// Fixture host that echoes a deterministic URL built from the file name.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureImageHost;

#[async_trait]
impl ImageHost for FixtureImageHost {
    async fn upload(&self, upload: &ImageUpload) -> Result<HostedImage, ImageHostError> {
        Ok(HostedImage {
            secure_url: format!("https://images.invalid/{}/{}", upload.folder, upload.file_name),
        })
    }
}
