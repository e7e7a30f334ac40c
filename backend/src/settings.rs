//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `INVENTORY_*` environment variables, or a
//! configuration file, in that order of precedence. Session cookie settings
//! are separate; see `inbound::http::session_config`.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use inventory_backend::domain::{DEFAULT_FILE_SIZE_PRECISION, MediaPolicy};
use inventory_backend::outbound::media::CloudinaryCredentials;
use inventory_backend::outbound::persistence::PoolConfig;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MEDIA_BASE_URL: &str = "https://api.cloudinary.com";
const DEFAULT_MEDIA_FOLDER: &str = "inventory";
const DEFAULT_MEDIA_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration for the inventory server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "INVENTORY")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL URL. Products are kept in memory when unset.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Image host API root.
    pub media_base_url: Option<String>,
    /// Image host account name.
    pub media_cloud_name: Option<String>,
    /// Image host API key.
    pub media_api_key: Option<String>,
    /// Image host signing secret.
    pub media_api_secret: Option<String>,
    /// Destination folder for uploads.
    pub media_folder: Option<String>,
    /// Upload timeout in seconds.
    pub media_timeout_secs: Option<u64>,
    /// Decimal places used when rendering upload sizes.
    pub file_size_precision: Option<u8>,
}

impl AppSettings {
    /// Resolve the listening address.
    ///
    /// # Errors
    ///
    /// Returns an error when the host cannot be resolved.
    pub fn bind_addr(&self) -> io::Result<SocketAddr> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let port = self.port.unwrap_or(DEFAULT_PORT);
        (host, port).to_socket_addrs()?.next().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("no address for {host}:{port}"),
            )
        })
    }

    /// Pool configuration when a database URL is set.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref().filter(|url| !url.trim().is_empty())?;
        let config = PoolConfig::new(url);
        Some(match self.db_max_connections {
            Some(max) => config.with_max_size(max),
            None => config,
        })
    }

    /// Image host API root, defaulting to the public endpoint.
    pub fn media_base_url(&self) -> &str {
        self.media_base_url
            .as_deref()
            .unwrap_or(DEFAULT_MEDIA_BASE_URL)
    }

    /// Image host credentials when all three values are set.
    pub fn media_credentials(&self) -> Option<CloudinaryCredentials> {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };
        Some(CloudinaryCredentials {
            cloud_name: non_blank(&self.media_cloud_name)?,
            api_key: non_blank(&self.media_api_key)?,
            api_secret: non_blank(&self.media_api_secret)?,
        })
    }

    /// Upload timeout, defaulting when unset.
    pub fn media_timeout(&self) -> Duration {
        Duration::from_secs(self.media_timeout_secs.unwrap_or(DEFAULT_MEDIA_TIMEOUT_SECS))
    }

    /// Upload folder and size precision for the product service.
    pub fn media_policy(&self) -> MediaPolicy {
        MediaPolicy {
            folder: self
                .media_folder
                .clone()
                .unwrap_or_else(|| DEFAULT_MEDIA_FOLDER.to_owned()),
            precision: self
                .file_size_precision
                .unwrap_or(DEFAULT_FILE_SIZE_PRECISION),
        }
    }
}
