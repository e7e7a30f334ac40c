//! Request validation helpers for the product routes.
//!
//! Field-level checks (numbers, image types) belong to the domain and run
//! after the target product has been found; only transport concerns live
//! here.

use serde_json::json;

use crate::domain::{Error, ProductId};

const INVALID_MULTIPART: &str = "invalid_multipart";

/// Report a malformed multipart body.
pub(crate) fn invalid_multipart(message: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("invalid form data: {message}")).with_details(json!({
        "code": INVALID_MULTIPART,
    }))
}

/// Parse a product id from the path. Text that is not a UUID cannot name a
/// stored product, so it is reported as missing.
pub(crate) fn parse_product_id(raw: &str) -> Result<ProductId, Error> {
    raw.parse()
        .map_err(|_| Error::not_found("Product not found"))
}
