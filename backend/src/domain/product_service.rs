//! Product domain service.
//!
//! Implements the product driving ports on top of the repository and image
//! host ports. Every operation follows the same order: look up and check
//! ownership where a product is named, validate the submitted fields and the
//! image type, transfer the optional image, then write once. Nothing is
//! persisted when an earlier step fails.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::domain::ports::{
    CreateProductRequest, CreateProductResponse, DeleteProductRequest, DeleteProductResponse,
    GetProductRequest, GetProductResponse, ImageHost, ImageUpload, ListProductsRequest,
    ListProductsResponse, ProductCommand, ProductQuery, ProductRepository,
    ProductRepositoryError, ResourceType, UpdateProductRequest, UpdateProductResponse,
    UploadedImage,
};
use crate::domain::{
    ACCEPTED_IMAGE_TYPES, DEFAULT_FILE_SIZE_PRECISION, Error, Product, ProductChanges,
    ProductDetails, ProductDraft, ProductField, ProductId, ProductImage, ProductValidationError,
    UserId, ensure_image_type, format_file_size,
};

const PRODUCT_NOT_FOUND: &str = "Product not found";
const UPLOAD_FAILED: &str = "Image could not be uploaded";
const IMAGE_FIELD: &str = "image";

/// Where uploads are stored and how their size is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPolicy {
    /// Destination folder on the image host.
    pub folder: String,
    /// Decimal places used by [`format_file_size`].
    pub precision: u8,
}

impl Default for MediaPolicy {
    fn default() -> Self {
        Self {
            folder: "inventory".to_owned(),
            precision: DEFAULT_FILE_SIZE_PRECISION,
        }
    }
}

fn map_repository_error(error: ProductRepositoryError) -> Error {
    match error {
        ProductRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("product repository unavailable: {message}"))
        }
        ProductRepositoryError::Query { message } => {
            Error::internal(format!("product repository error: {message}"))
        }
    }
}

fn field_error(message: &str, field: ProductField, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code,
    }))
}

fn map_validation_error(error: ProductValidationError) -> Error {
    match error {
        ProductValidationError::MissingFields(fields) => {
            let first = fields.first().copied().unwrap_or(ProductField::Name);
            let names: Vec<&str> = fields.iter().map(|field| field.as_str()).collect();
            Error::invalid_request("Please fill in all fields").with_details(json!({
                "field": first.as_str(),
                "code": "missing_field",
                "missingFields": names,
            }))
        }
        ProductValidationError::BlankField(field) => field_error(
            &format!("{field} must not be empty"),
            field,
            "empty_field",
        ),
        ProductValidationError::InvalidNumber(field) => {
            let message = match field {
                ProductField::Quantity => "quantity must be a whole number",
                _ => "price must be a number",
            };
            field_error(message, field, "invalid_number")
        }
        ProductValidationError::NonFinitePrice => field_error(
            "price must be a finite number",
            ProductField::Price,
            "invalid_number",
        ),
        ProductValidationError::UnsupportedImageType(declared) => {
            Error::invalid_request(format!(
                "unsupported image type {}; expected one of {}",
                declared.as_deref().unwrap_or("(none)"),
                ACCEPTED_IMAGE_TYPES.join(", ")
            ))
            .with_details(json!({
                "field": IMAGE_FIELD,
                "code": "unsupported_image_type",
            }))
        }
    }
}

fn not_found() -> Error {
    Error::not_found(PRODUCT_NOT_FOUND)
}

/// Product service implementing the command and query driving ports.
///
/// `R` and `H` may be trait objects, so the server can pick adapters at
/// runtime.
pub struct ProductService<R: ?Sized, H: ?Sized> {
    product_repo: Arc<R>,
    image_host: Arc<H>,
    clock: Arc<dyn Clock>,
    media: MediaPolicy,
}

impl<R: ?Sized, H: ?Sized> Clone for ProductService<R, H> {
    fn clone(&self) -> Self {
        Self {
            product_repo: Arc::clone(&self.product_repo),
            image_host: Arc::clone(&self.image_host),
            clock: Arc::clone(&self.clock),
            media: self.media.clone(),
        }
    }
}

impl<R: ?Sized, H: ?Sized> ProductService<R, H> {
    /// Create a new service.
    pub fn new(
        product_repo: Arc<R>,
        image_host: Arc<H>,
        clock: Arc<dyn Clock>,
        media: MediaPolicy,
    ) -> Self {
        Self {
            product_repo,
            image_host,
            clock,
            media,
        }
    }
}

impl<R, H> ProductService<R, H>
where
    R: ProductRepository + ?Sized,
    H: ImageHost + ?Sized,
{
    async fn load_owned(&self, owner: &UserId, id: &ProductId) -> Result<Product, Error> {
        let product = self
            .product_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(not_found)?;
        product.ensure_owned_by(owner)?;
        Ok(product)
    }

    async fn transfer_image(
        &self,
        image: Option<&UploadedImage>,
    ) -> Result<Option<ProductImage>, Error> {
        let Some(image) = image else {
            return Ok(None);
        };
        ensure_image_type(&image.content_type).map_err(map_validation_error)?;
        let upload = ImageUpload {
            path: image.path.clone(),
            file_name: image.file_name.clone(),
            content_type: image.content_type.clone(),
            folder: self.media.folder.clone(),
            resource_type: ResourceType::Image,
        };
        let hosted = self.image_host.upload(&upload).await.map_err(|err| {
            warn!(error = %err, file_name = %image.file_name, "image upload failed");
            Error::upload_failed(UPLOAD_FAILED)
        })?;
        debug!(file_name = %image.file_name, size = image.size, "image uploaded");
        Ok(Some(ProductImage {
            file_name: image.file_name.clone(),
            file_path: hosted.secure_url,
            file_type: image.content_type.clone(),
            file_size: format_file_size(image.size, self.media.precision),
        }))
    }
}

#[async_trait]
impl<R, H> ProductCommand for ProductService<R, H>
where
    R: ProductRepository + ?Sized,
    H: ImageHost + ?Sized,
{
    #[instrument(skip_all, fields(owner = %request.owner))]
    async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<CreateProductResponse, Error> {
        let CreateProductRequest {
            owner,
            fields,
            image,
        } = request;
        let details = ProductDetails::try_from(fields).map_err(map_validation_error)?;
        let image = self.transfer_image(image.as_ref()).await?;

        let now = self.clock.utc();
        let product = Product::new(ProductDraft {
            id: ProductId::random(),
            owner_id: owner,
            details,
            image: image.into(),
            created_at: now,
            updated_at: now,
        })
        .map_err(map_validation_error)?;

        self.product_repo
            .insert(&product)
            .await
            .map_err(map_repository_error)?;
        debug!(product = %product.id(), "product created");

        Ok(CreateProductResponse {
            product: product.into(),
        })
    }

    #[instrument(skip_all, fields(owner = %request.owner, product = %request.product_id))]
    async fn update_product(
        &self,
        request: UpdateProductRequest,
    ) -> Result<UpdateProductResponse, Error> {
        let UpdateProductRequest {
            owner,
            product_id,
            fields,
            image,
        } = request;
        let product = self.load_owned(&owner, &product_id).await?;
        let changes = ProductChanges::try_from(fields).map_err(map_validation_error)?;
        let image = self.transfer_image(image.as_ref()).await?;

        let updated = product.apply(changes, image, self.clock.utc());
        let replaced = self
            .product_repo
            .replace(&updated)
            .await
            .map_err(map_repository_error)?;
        if !replaced {
            return Err(not_found());
        }

        Ok(UpdateProductResponse {
            product: updated.into(),
        })
    }

    #[instrument(skip_all, fields(owner = %request.owner, product = %request.product_id))]
    async fn delete_product(
        &self,
        request: DeleteProductRequest,
    ) -> Result<DeleteProductResponse, Error> {
        let product = self.load_owned(&request.owner, &request.product_id).await?;
        let deleted = self
            .product_repo
            .delete(&product.id())
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(not_found());
        }

        Ok(DeleteProductResponse {
            product_id: product.id(),
        })
    }
}

#[async_trait]
impl<R, H> ProductQuery for ProductService<R, H>
where
    R: ProductRepository + ?Sized,
    H: ImageHost + ?Sized,
{
    #[instrument(skip_all, fields(owner = %request.owner))]
    async fn list_products(
        &self,
        request: ListProductsRequest,
    ) -> Result<ListProductsResponse, Error> {
        let products = self
            .product_repo
            .list_by_owner(&request.owner)
            .await
            .map_err(map_repository_error)?;

        Ok(ListProductsResponse {
            products: products.into_iter().map(Into::into).collect(),
        })
    }

    #[instrument(skip_all, fields(owner = %request.owner, product = %request.product_id))]
    async fn get_product(&self, request: GetProductRequest) -> Result<GetProductResponse, Error> {
        let product = self.load_owned(&request.owner, &request.product_id).await?;

        Ok(GetProductResponse {
            product: product.into(),
        })
    }
}

#[cfg(test)]
#[path = "product_service_tests.rs"]
mod tests;
