//! Product HTTP handlers.
//!
//! ```text
//! POST   /api/v1/products
//! GET    /api/v1/products
//! GET    /api/v1/products/{id}
//! PUT    /api/v1/products/{id}
//! DELETE /api/v1/products/{id}
//! ```
//!
//! Create and update accept `multipart/form-data` with text parts for the
//! product fields and an optional `image` file part.

use actix_multipart::MultipartError;
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use actix_multipart::form::{MultipartForm, MultipartFormConfig};
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{
    CreateProductRequest, DeleteProductRequest, GetProductRequest, ListProductsRequest,
    ProductPayload, UpdateProductRequest, UploadedImage,
};
use crate::domain::{ImageAttachment, ProductFields, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, ImageAttachmentSchema, ProductFormSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{invalid_multipart, parse_product_id};

/// Upper bound for a single image part.
const IMAGE_LIMIT_BYTES: usize = 10 * 1024 * 1024;
const UNNAMED_UPLOAD: &str = "upload";

/// Multipart form shared by create and update.
///
/// Parts are taken as text; the domain judges them once ownership is known.
#[derive(MultipartForm)]
pub struct ProductForm {
    /// Display name.
    pub name: Option<Text<String>>,
    /// Stock-keeping unit; ignored on update.
    pub sku: Option<Text<String>>,
    /// Free-text grouping.
    pub category: Option<Text<String>>,
    /// Whole number of units.
    pub quantity: Option<Text<String>>,
    /// Decimal unit price.
    pub price: Option<Text<String>>,
    /// Long-form description.
    pub description: Option<Text<String>>,
    /// Optional PNG or JPEG picture.
    #[multipart(limit = "10MB")]
    pub image: Option<TempFile>,
}

/// A validated upload. The temp file is deleted when this is dropped, so it
/// must outlive the service call.
struct StagedImage {
    _file: TempFile,
    upload: UploadedImage,
}

struct ProductSubmission {
    fields: ProductFields,
    image: Option<StagedImage>,
}

fn text(value: Option<Text<String>>) -> Option<String> {
    value.map(|text| text.0)
}

fn stage_image(file: Option<TempFile>) -> Option<StagedImage> {
    let file = file?;
    let unnamed = file.file_name.as_deref().is_none_or(str::is_empty);
    if file.size == 0 && unnamed {
        return None;
    }
    let content_type = file
        .content_type
        .as_ref()
        .map(|mime| mime.essence_str().to_owned())
        .unwrap_or_default();
    let file_name = file
        .file_name
        .clone()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNNAMED_UPLOAD.to_owned());
    let upload = UploadedImage {
        path: file.file.path().to_path_buf(),
        file_name,
        content_type,
        size: u64::try_from(file.size).unwrap_or(u64::MAX),
    };
    Some(StagedImage {
        _file: file,
        upload,
    })
}

impl ProductForm {
    fn into_submission(self) -> ProductSubmission {
        let Self {
            name,
            sku,
            category,
            quantity,
            price,
            description,
            image,
        } = self;
        ProductSubmission {
            fields: ProductFields {
                name: text(name),
                sku: text(sku),
                category: text(category),
                quantity: text(quantity),
                price: text(price),
                description: text(description),
            },
            image: stage_image(image),
        }
    }
}

fn form_error_handler(error: MultipartError, _req: &HttpRequest) -> actix_web::Error {
    invalid_multipart(error).into()
}

/// Multipart limits and error mapping for the product routes.
pub fn multipart_config() -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(IMAGE_LIMIT_BYTES + 64 * 1024)
        .error_handler(form_error_handler)
}

/// Register the product routes and their multipart configuration.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(multipart_config())
        .service(create_product)
        .service(list_products)
        .service(get_product)
        .service(update_product)
        .service(delete_product);
}

/// Product representation returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductBody {
    /// Product identifier.
    pub id: Uuid,
    /// Creating user.
    #[schema(value_type = String, format = Uuid)]
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
    /// Attached image, or `{}` when none.
    #[schema(value_type = ImageAttachmentSchema)]
    pub image: ImageAttachment,
    /// Creation time.
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

impl From<ProductPayload> for ProductBody {
    fn from(value: ProductPayload) -> Self {
        let ProductPayload {
            id,
            owner_id,
            name,
            sku,
            category,
            quantity,
            price,
            description,
            image,
            created_at,
            updated_at,
        } = value;
        Self {
            id,
            owner_id,
            name,
            sku,
            category,
            quantity,
            price,
            description,
            image,
            created_at,
            updated_at,
        }
    }
}

/// Listing response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsBody {
    /// Number of entries in `products`.
    pub products_count: usize,
    /// Caller's products, newest first.
    pub products: Vec<ProductBody>,
}

/// Update response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductBody {
    /// Always `true`.
    pub success: bool,
    /// Product after the update.
    pub updated_product: ProductBody,
}

/// Delete response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProductBody {
    /// Confirmation text.
    #[schema(example = "Product deleted successfully")]
    pub message: String,
    /// Always `true`.
    pub success: bool,
}

/// Create a product owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body(content = ProductFormSchema, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created", body = ProductBody),
        (status = 400, description = "Missing or invalid fields", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 500, description = "Image upload failed", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "createProduct",
    security(("SessionCookie" = []))
)]
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    MultipartForm(form): MultipartForm<ProductForm>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let ProductSubmission { fields, image } = form.into_submission();

    let response = state
        .products
        .create_product(CreateProductRequest {
            owner,
            fields,
            image: image.as_ref().map(|staged| staged.upload.clone()),
        })
        .await?;

    Ok(HttpResponse::Created().json(ProductBody::from(response.product)))
}

/// List the caller's products, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    responses(
        (status = 200, description = "Products owned by the caller", body = ListProductsBody),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "listProducts",
    security(("SessionCookie" = []))
)]
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ListProductsBody>> {
    let owner = session.require_user_id()?;
    let response = state
        .products_query
        .list_products(ListProductsRequest { owner })
        .await?;

    let products: Vec<ProductBody> = response.products.into_iter().map(Into::into).collect();
    Ok(web::Json(ListProductsBody {
        products_count: products.len(),
        products,
    }))
}

/// Fetch one product owned by the caller.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Product", body = ProductBody),
        (status = 401, description = "Login required or not the owner", body = ErrorSchema),
        (status = 404, description = "Product not found", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "getProduct",
    security(("SessionCookie" = []))
)]
#[get("/products/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProductBody>> {
    let owner = session.require_user_id()?;
    let product_id = parse_product_id(&path)?;
    let response = state
        .products_query
        .get_product(GetProductRequest { owner, product_id })
        .await?;

    Ok(web::Json(response.product.into()))
}

/// Update a product owned by the caller. Absent parts keep stored values.
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product identifier")),
    request_body(content = ProductFormSchema, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product updated", body = UpdateProductBody),
        (status = 400, description = "Invalid fields", body = ErrorSchema),
        (status = 401, description = "Login required or not the owner", body = ErrorSchema),
        (status = 404, description = "Product not found", body = ErrorSchema),
        (status = 500, description = "Image upload failed", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "updateProduct",
    security(("SessionCookie" = []))
)]
#[put("/products/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    MultipartForm(form): MultipartForm<ProductForm>,
) -> ApiResult<web::Json<UpdateProductBody>> {
    let owner = session.require_user_id()?;
    let product_id = parse_product_id(&path)?;
    let ProductSubmission { fields, image } = form.into_submission();

    let response = state
        .products
        .update_product(UpdateProductRequest {
            owner,
            product_id,
            fields,
            image: image.as_ref().map(|staged| staged.upload.clone()),
        })
        .await?;

    Ok(web::Json(UpdateProductBody {
        success: true,
        updated_product: response.product.into(),
    }))
}

/// Permanently delete a product owned by the caller.
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Product deleted", body = DeleteProductBody),
        (status = 401, description = "Login required or not the owner", body = ErrorSchema),
        (status = 404, description = "Product not found", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "deleteProduct",
    security(("SessionCookie" = []))
)]
#[delete("/products/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteProductBody>> {
    let owner = session.require_user_id()?;
    let product_id = parse_product_id(&path)?;
    state
        .products
        .delete_product(DeleteProductRequest { owner, product_id })
        .await?;

    Ok(web::Json(DeleteProductBody {
        message: "Product deleted successfully".to_owned(),
        success: true,
    }))
}

#[cfg(test)]
#[path = "products_tests.rs"]
mod tests;
