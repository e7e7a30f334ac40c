//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use inventory_backend::domain::MediaPolicy;
use inventory_backend::domain::ports::ImageHost;
use inventory_backend::inbound::http::session_config::SessionSettings;
use inventory_backend::outbound::media::DisabledImageHost;
use inventory_backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) image_host: Arc<dyn ImageHost>,
    pub(crate) media: MediaPolicy,
}

impl ServerConfig {
    /// Uploads are disabled and products stay in memory until the builder
    /// methods attach real adapters.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            image_host: Arc::new(DisabledImageHost),
            media: MediaPolicy::default(),
        }
    }

    /// Persist products in PostgreSQL through this pool.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Send uploads to `image_host`.
    #[must_use]
    pub fn with_image_host(mut self, image_host: Arc<dyn ImageHost>) -> Self {
        self.image_host = image_host;
        self
    }

    /// Override the upload folder and size precision.
    #[must_use]
    pub fn with_media_policy(mut self, media: MediaPolicy) -> Self {
        self.media = media;
        self
    }
}
