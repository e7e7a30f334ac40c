//! Builders selecting the product adapters behind the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::warn;

use inventory_backend::domain::ports::{ImageHost, ProductRepository};
use inventory_backend::domain::{MediaPolicy, ProductService};
use inventory_backend::inbound::http::state::HttpState;
use inventory_backend::outbound::memory::InMemoryProductRepository;
use inventory_backend::outbound::persistence::{DbPool, DieselProductRepository};

use super::ServerConfig;

/// Select the Diesel repository when a pool is available, otherwise an
/// in-memory store.
fn build_product_repository<P>(
    pool: Option<&P>,
    make_repo: impl FnOnce(&P) -> Arc<dyn ProductRepository>,
) -> Arc<dyn ProductRepository> {
    match pool {
        Some(pool) => make_repo(pool),
        None => {
            warn!("no database configured; products are kept in memory");
            Arc::new(InMemoryProductRepository::new())
        }
    }
}

fn diesel_repository(pool: &DbPool) -> Arc<dyn ProductRepository> {
    Arc::new(DieselProductRepository::new(pool.clone()))
}

/// Wire one product service behind both driving ports.
fn build_product_state(
    repo: Arc<dyn ProductRepository>,
    image_host: Arc<dyn ImageHost>,
    clock: Arc<dyn Clock>,
    media: MediaPolicy,
) -> HttpState {
    let service = Arc::new(ProductService::new(repo, image_host, clock, media));
    HttpState::new(service.clone(), service)
}

/// Build the HTTP state for the configured adapters.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let repo = build_product_repository(config.db_pool.as_ref(), diesel_repository);
    web::Data::new(build_product_state(
        repo,
        Arc::clone(&config.image_host),
        Arc::new(DefaultClock),
        config.media.clone(),
    ))
}
