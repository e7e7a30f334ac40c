//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework agnostic by not deriving `ToSchema`; the
//! wrappers here mirror their wire shape for documentation only.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// Malformed input or a failed field check.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No session, or the product belongs to someone else.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// No product with that id.
    #[schema(rename = "not_found")]
    NotFound,
    /// The image host rejected or never received the upload.
    #[schema(rename = "upload_failed")]
    UploadFailed,
    /// A dependency is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// Unexpected failure; the message is redacted.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Please fill in all fields")]
    message: String,
    /// Correlation identifier, also sent in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level context such as `{ "field": "price", "code": "invalid_number" }`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::ImageAttachment`].
///
/// An empty object when no image is attached; otherwise all four fields.
#[derive(ToSchema)]
#[schema(as = ImageAttachment)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ImageAttachmentSchema {
    #[schema(example = "widget.png")]
    file_name: Option<String>,
    /// Durable URL on the image host.
    #[schema(example = "https://res.cloudinary.com/demo/image/upload/widget.png")]
    file_path: Option<String>,
    #[schema(example = "image/png")]
    file_type: Option<String>,
    #[schema(example = "1.5 KB")]
    file_size: Option<String>,
}

/// OpenAPI schema for the multipart product form.
#[derive(ToSchema)]
#[schema(as = ProductForm)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ProductFormSchema {
    name: Option<String>,
    /// Ignored on update.
    sku: Option<String>,
    category: Option<String>,
    /// Whole number.
    #[schema(example = "5")]
    quantity: Option<String>,
    /// Decimal number.
    #[schema(example = "9.99")]
    price: Option<String>,
    description: Option<String>,
    /// PNG or JPEG file.
    #[schema(value_type = Option<String>, format = Binary)]
    image: Option<Vec<u8>>,
}
