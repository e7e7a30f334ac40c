//! Domain primitives, aggregates, and services.
//!
//! Types here are transport agnostic. Inbound adapters translate requests
//! into driving port calls; outbound adapters implement the driven ports.
//!
//! Public surface:
//! - [`Product`] and its image attachment types.
//! - [`Error`] and [`ErrorCode`], the failure taxonomy shared by every layer.
//! - [`ProductService`], which implements the product driving ports.

pub mod error;
mod file_size;
pub mod ports;
mod product;
mod product_service;
mod trace_id;
mod user;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::file_size::{DEFAULT_FILE_SIZE_PRECISION, format_file_size};
pub use self::product::{
    ACCEPTED_IMAGE_TYPES, ImageAttachment, Product, ProductChanges, ProductDetails, ProductDraft,
    ProductField, ProductFields, ProductId, ProductImage, ProductValidationError,
    ensure_image_type,
};
pub use self::product_service::{MediaPolicy, ProductService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserIdValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use inventory_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("Product not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
