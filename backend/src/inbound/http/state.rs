//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and depend only on
//! driving ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureProductCommand, FixtureProductQuery, ProductCommand, ProductQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Create, update, and delete.
    pub products: Arc<dyn ProductCommand>,
    /// List and fetch.
    pub products_query: Arc<dyn ProductQuery>,
}

impl HttpState {
    /// Construct state from the product ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use inventory_backend::domain::ports::{FixtureProductCommand, FixtureProductQuery};
    /// use inventory_backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(Arc::new(FixtureProductCommand), Arc::new(FixtureProductQuery));
    /// let _products = state.products.clone();
    /// ```
    pub fn new(products: Arc<dyn ProductCommand>, products_query: Arc<dyn ProductQuery>) -> Self {
        Self {
            products,
            products_query,
        }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(Arc::new(FixtureProductCommand), Arc::new(FixtureProductQuery))
    }
}
