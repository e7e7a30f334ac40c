//! In-process product store.
//!
//! Used when no database URL is configured and by integration tests. Data
//! lives for the lifetime of the process only.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{Product, ProductId, UserId};

/// `ProductRepository` backed by a `RwLock<HashMap>`.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryProductRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored products across every owner.
    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    /// True when no products are stored.
    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Product>, ProductRepositoryError> {
        let guard = self.products.read().await;
        let mut owned: Vec<Product> = guard
            .values()
            .filter(|product| product.is_owned_by(owner))
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(owned)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        Ok(self.products.read().await.get(id).cloned())
    }

    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        let mut guard = self.products.write().await;
        if guard.contains_key(&product.id()) {
            return Err(ProductRepositoryError::query("duplicate product id"));
        }
        guard.insert(product.id(), product.clone());
        Ok(())
    }

    async fn replace(&self, product: &Product) -> Result<bool, ProductRepositoryError> {
        let mut guard = self.products.write().await;
        match guard.get_mut(&product.id()) {
            Some(stored) => {
                *stored = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, ProductRepositoryError> {
        Ok(self.products.write().await.remove(id).is_some())
    }
}
