//! Driving port for product mutations.
//!
//! Inbound adapters hand over the caller identity, the submitted fields, and
//! an optional staged upload; the domain decides validation order, ownership,
//! and when the image is transferred.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Error, ImageAttachment, Product, ProductDetails, ProductDraft, ProductFields, ProductId,
    UserId,
};

/// Serializable product payload for driving ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    /// Product identifier.
    pub id: Uuid,
    /// Creating user.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Stock-keeping unit.
    pub sku: String,
    /// Free-text grouping.
    pub category: String,
    /// Units in stock.
    pub quantity: i64,
    /// Unit price.
    pub price: f64,
    /// Long-form description.
    pub description: String,
    /// Attached image or `Empty`.
    pub image: ImageAttachment,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductPayload {
    fn from(value: Product) -> Self {
        Self {
            id: *value.id().as_uuid(),
            owner_id: *value.owner_id(),
            name: value.name().to_owned(),
            sku: value.sku().to_owned(),
            category: value.category().to_owned(),
            quantity: value.quantity(),
            price: value.price(),
            description: value.description().to_owned(),
            image: value.image().clone(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
        }
    }
}

/// A file received from the client and staged on local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Location of the staged bytes; valid until the request completes.
    pub path: PathBuf,
    /// Client-supplied file name.
    pub file_name: String,
    /// Declared MIME type; empty when the client sent none.
    pub content_type: String,
    /// Size in bytes.
    pub size: u64,
}

/// Request to create a product owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProductRequest {
    /// Authenticated caller.
    pub owner: UserId,
    /// Raw form fields.
    pub fields: ProductFields,
    /// Staged upload, if the form carried one.
    pub image: Option<UploadedImage>,
}

/// Response from creating a product.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProductResponse {
    /// Resulting product.
    pub product: ProductPayload,
}

/// Request to update a product; absent fields keep their stored values.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProductRequest {
    /// Authenticated caller.
    pub owner: UserId,
    /// Target product.
    pub product_id: ProductId,
    /// Raw form fields.
    pub fields: ProductFields,
    /// Staged upload, if the form carried one.
    pub image: Option<UploadedImage>,
}

/// Response from updating a product.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProductResponse {
    /// Resulting product.
    pub product: ProductPayload,
}

/// Request to delete a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteProductRequest {
    /// Authenticated caller.
    pub owner: UserId,
    /// Target product.
    pub product_id: ProductId,
}

/// Response from deleting a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteProductResponse {
    /// Target product.
    pub product_id: ProductId,
}

/// Driving port for product write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCommand: Send + Sync {
    /// Create a product after validating every required field.
    ///
    /// The staged image, when present, is uploaded only once validation has
    /// passed; nothing is persisted if the upload fails.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use inventory_backend::domain::{ProductFields, UserId};
    /// # use inventory_backend::domain::ports::{
    /// #     CreateProductRequest, FixtureProductCommand, ProductCommand,
    /// # };
    /// # async fn example() -> Result<(), inventory_backend::domain::Error> {
    /// let command = FixtureProductCommand;
    /// let response = command
    ///     .create_product(CreateProductRequest {
    ///         owner: UserId::random(),
    ///         fields: ProductFields {
    ///             name: Some("Widget".into()),
    ///             sku: Some("W1".into()),
    ///             category: Some("Tools".into()),
    ///             quantity: Some("5".into()),
    ///             price: Some("9.99".into()),
    ///             description: Some("A sturdy widget".into()),
    ///         },
    ///         image: None,
    ///     })
    ///     .await?;
    /// assert_eq!(response.product.name, "Widget");
    /// # Ok(())
    /// # }
    /// ```
    async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<CreateProductResponse, Error>;

    /// Update a product owned by the caller.
    async fn update_product(
        &self,
        request: UpdateProductRequest,
    ) -> Result<UpdateProductResponse, Error>;

    /// Permanently delete a product owned by the caller.
    async fn delete_product(
        &self,
        request: DeleteProductRequest,
    ) -> Result<DeleteProductResponse, Error>;
}

/// Fixture command implementation for tests that do not need persistence.
///
/// Creation echoes a product built from the request; updates and deletes
/// report the product as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProductCommand;

#[async_trait]
impl ProductCommand for FixtureProductCommand {
    async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<CreateProductResponse, Error> {
        let details = ProductDetails::try_from(request.fields)
            .map_err(|err| Error::invalid_request(format!("invalid product payload: {err}")))?;
        let now = Utc::now();
        let product = Product::new(ProductDraft {
            id: ProductId::random(),
            owner_id: request.owner,
            details,
            image: ImageAttachment::Empty,
            created_at: now,
            updated_at: now,
        })
        .map_err(|err| Error::invalid_request(format!("invalid product payload: {err}")))?;
        Ok(CreateProductResponse {
            product: product.into(),
        })
    }

    async fn update_product(
        &self,
        _request: UpdateProductRequest,
    ) -> Result<UpdateProductResponse, Error> {
        Err(Error::not_found("Product not found"))
    }

    async fn delete_product(
        &self,
        _request: DeleteProductRequest,
    ) -> Result<DeleteProductResponse, Error> {
        Err(Error::not_found("Product not found"))
    }
}
