//! Backend entry-point: loads configuration, selects adapters, and serves the
//! product API.

mod server;
mod settings;

use std::sync::Arc;

use actix_web::web;
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use inventory_backend::domain::ports::ImageHost;
use inventory_backend::inbound::http::health::HealthState;
use inventory_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use inventory_backend::outbound::media::{CloudinaryImageHost, DisabledImageHost};
use inventory_backend::outbound::persistence::{DbPool, run_pending_migrations};
use server::{ServerConfig, create_server};
use settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %session.key_fingerprint(),
        "session signing key loaded"
    );

    let mut config = ServerConfig::new(session, settings.bind_addr()?)
        .with_image_host(build_image_host(&settings)?)
        .with_media_policy(settings.media_policy());

    if let Some(pool_config) = settings.pool_config() {
        run_pending_migrations(pool_config.database_url())
            .await
            .map_err(std::io::Error::other)?;
        let pool = DbPool::new(pool_config)
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}

fn build_image_host(settings: &AppSettings) -> std::io::Result<Arc<dyn ImageHost>> {
    let Some(credentials) = settings.media_credentials() else {
        warn!("image host credentials not configured; uploads will fail");
        return Ok(Arc::new(DisabledImageHost));
    };
    let host = CloudinaryImageHost::new(
        settings.media_base_url(),
        credentials,
        settings.media_timeout(),
        Arc::new(DefaultClock),
    )
    .map_err(std::io::Error::other)?;
    Ok(Arc::new(host))
}
