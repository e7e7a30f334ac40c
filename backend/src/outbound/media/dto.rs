//! DTOs for decoding image host responses.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct UploadResponseDto {
    pub(super) secure_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorResponseDto {
    pub(super) error: ErrorBodyDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    pub(super) message: String,
}

impl UploadResponseDto {
    pub(super) fn into_secure_url(self) -> Result<String, String> {
        match self.secure_url {
            Some(url) if url.starts_with("https://") => Ok(url),
            Some(url) => Err(format!("secure_url is not an https URL: {url}")),
            None => Err("response is missing secure_url".to_owned()),
        }
    }
}
