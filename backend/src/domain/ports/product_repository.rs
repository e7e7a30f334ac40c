//! Port for product persistence.

use async_trait::async_trait;

use crate::domain::{Product, ProductId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by product repository adapters.
    pub enum ProductRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "product repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "product repository query failed: {message}",
    }
}

/// Port for reading and writing products.
///
/// Adapters never filter by owner on single-item reads; the service decides
/// whether the caller may see a product.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// List every product owned by `owner`, newest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Find a product by id regardless of owner.
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError>;

    /// Persist a new product.
    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError>;

    /// Overwrite a stored product. Returns `false` when no row matched.
    async fn replace(&self, product: &Product) -> Result<bool, ProductRepositoryError>;

    /// Remove a product. Returns `false` when no row matched.
    async fn delete(&self, id: &ProductId) -> Result<bool, ProductRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProductRepository;

#[async_trait]
impl ProductRepository for FixtureProductRepository {
    async fn list_by_owner(&self, _owner: &UserId) -> Result<Vec<Product>, ProductRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _product: &Product) -> Result<(), ProductRepositoryError> {
        Ok(())
    }

    async fn replace(&self, _product: &Product) -> Result<bool, ProductRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _id: &ProductId) -> Result<bool, ProductRepositoryError> {
        Ok(false)
    }
}
