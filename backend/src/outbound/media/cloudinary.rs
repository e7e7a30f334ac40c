//! Reqwest-backed Cloudinary upload adapter.
//!
//! Owns transport details only: reading the staged file, request signing,
//! timeout and status mapping, and decoding the durable URL.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::dto::{ErrorResponseDto, UploadResponseDto};
use crate::domain::ports::{HostedImage, ImageHost, ImageHostError, ImageUpload, ResourceType};

const SIGNATURE_ALGORITHM: &str = "sha256";
const PREVIEW_CHAR_LIMIT: usize = 160;

/// Account credentials for the upload API.
#[derive(Clone)]
pub struct CloudinaryCredentials {
    /// Account name, part of every upload URL.
    pub cloud_name: String,
    /// Public key sent with each upload.
    pub api_key: String,
    /// Signing secret; never sent over the wire.
    pub api_secret: String,
}

impl std::fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Errors raised while constructing the adapter.
#[derive(Debug, thiserror::Error)]
pub enum CloudinaryConfigError {
    /// The configured API root is not an absolute URL.
    #[error("invalid image host base URL '{url}': {message}")]
    InvalidBaseUrl {
        /// Rejected value.
        url: String,
        /// Parser explanation.
        message: String,
    },
    /// The HTTP client could not be built.
    #[error("failed to build image host client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Image host adapter for Cloudinary's signed upload endpoint.
pub struct CloudinaryImageHost {
    client: Client,
    base_url: Url,
    credentials: CloudinaryCredentials,
    clock: Arc<dyn Clock>,
}

impl CloudinaryImageHost {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CloudinaryConfigError`] when `base_url` is not an absolute
    /// URL or the reqwest client cannot be constructed.
    pub fn new(
        base_url: &str,
        credentials: CloudinaryCredentials,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CloudinaryConfigError> {
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|err| {
            CloudinaryConfigError::InvalidBaseUrl {
                url: base_url.to_owned(),
                message: err.to_string(),
            }
        })?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            credentials,
            clock,
        })
    }

    fn upload_url(&self, resource_type: ResourceType) -> String {
        format!(
            "{base}/v1_1/{cloud}/{resource_type}/upload",
            base = self.base_url.as_str().trim_end_matches('/'),
            cloud = self.credentials.cloud_name,
        )
    }
}

#[async_trait]
impl ImageHost for CloudinaryImageHost {
    async fn upload(&self, upload: &ImageUpload) -> Result<HostedImage, ImageHostError> {
        let bytes = tokio::fs::read(&upload.path).await.map_err(|err| {
            ImageHostError::io(format!("{}: {err}", upload.path.display()))
        })?;
        let timestamp = self.clock.utc().timestamp();
        let signature = sign(&upload.folder, timestamp, &self.credentials.api_secret);

        let file = Part::bytes(bytes)
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(map_transport_error)?;
        let form = Form::new()
            .part("file", file)
            .text("api_key", self.credentials.api_key.clone())
            .text("folder", upload.folder.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature", signature)
            .text("signature_algorithm", SIGNATURE_ALGORITHM);

        let response = self
            .client
            .post(self.upload_url(upload.resource_type))
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let secure_url = parse_secure_url(body.as_ref())?;
        debug!(file_name = %upload.file_name, %secure_url, "image stored");
        Ok(HostedImage { secure_url })
    }
}

/// Hex SHA-256 over the sorted signed parameters followed by the secret.
fn sign(folder: &str, timestamp: i64, api_secret: &str) -> String {
    let payload = format!("folder={folder}&timestamp={timestamp}{api_secret}");
    hex::encode(Sha256::digest(payload.as_bytes()))
}

fn parse_secure_url(body: &[u8]) -> Result<String, ImageHostError> {
    let decoded: UploadResponseDto = serde_json::from_slice(body).map_err(|error| {
        ImageHostError::decode(format!("invalid upload response JSON: {error}"))
    })?;
    decoded.into_secure_url().map_err(ImageHostError::decode)
}

fn map_transport_error(error: reqwest::Error) -> ImageHostError {
    if error.is_timeout() {
        ImageHostError::timeout(error.to_string())
    } else {
        ImageHostError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ImageHostError {
    let message = serde_json::from_slice::<ErrorResponseDto>(body)
        .map(|dto| dto.error.message)
        .unwrap_or_else(|_| body_preview(body));

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ImageHostError::timeout(format!("status {}: {message}", status.as_u16()))
        }
        _ => ImageHostError::rejected(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
