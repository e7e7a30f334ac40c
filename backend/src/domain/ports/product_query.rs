//! Driving port for product reads.

use async_trait::async_trait;

use crate::domain::{Error, ProductId, UserId};

use super::product_command::ProductPayload;

/// Request to list the caller's products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListProductsRequest {
    /// Authenticated caller.
    pub owner: UserId,
}

/// Products owned by the caller, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ListProductsResponse {
    /// Matching products.
    pub products: Vec<ProductPayload>,
}

impl ListProductsResponse {
    /// Number of products returned.
    pub fn count(&self) -> usize {
        self.products.len()
    }
}

/// Request to fetch one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetProductRequest {
    /// Authenticated caller.
    pub owner: UserId,
    /// Target product.
    pub product_id: ProductId,
}

/// Response for a single product lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct GetProductResponse {
    /// Resulting product.
    pub product: ProductPayload,
}

/// Driving port for product read operations.
///
/// # Examples
///
/// ```rust,no_run
/// # use inventory_backend::domain::UserId;
/// # use inventory_backend::domain::ports::{
/// #     FixtureProductQuery, ListProductsRequest, ProductQuery,
/// # };
/// # async fn example() -> Result<(), inventory_backend::domain::Error> {
/// let query = FixtureProductQuery;
/// let response = query
///     .list_products(ListProductsRequest { owner: UserId::random() })
///     .await?;
/// assert_eq!(response.count(), 0);
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductQuery: Send + Sync {
    /// List every product owned by the caller, newest first.
    async fn list_products(
        &self,
        request: ListProductsRequest,
    ) -> Result<ListProductsResponse, Error>;

    /// Fetch one product; fails with 404 when absent and 401 when the caller
    /// is not the owner.
    async fn get_product(&self, request: GetProductRequest) -> Result<GetProductResponse, Error>;
}

/// Fixture query implementation with an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProductQuery;

#[async_trait]
impl ProductQuery for FixtureProductQuery {
    async fn list_products(
        &self,
        _request: ListProductsRequest,
    ) -> Result<ListProductsResponse, Error> {
        Ok(ListProductsResponse {
            products: Vec::new(),
        })
    }

    async fn get_product(&self, _request: GetProductRequest) -> Result<GetProductResponse, Error> {
        Err(Error::not_found("Product not found"))
    }
}
