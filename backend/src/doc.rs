//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the product and health endpoints, the response and
//! error schemas, and the session cookie security scheme. Swagger UI serves
//! it in debug builds and `cargo run --bin openapi-dump` prints it.

use crate::inbound::http::products::{
    DeleteProductBody, ListProductsBody, ProductBody, UpdateProductBody,
};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, ImageAttachmentSchema, ProductFormSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by the shared authentication service.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Inventory backend API",
        description = "Owner-scoped product inventory with image uploads."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::get_product,
        crate::inbound::http::products::update_product,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ProductBody,
        ListProductsBody,
        UpdateProductBody,
        DeleteProductBody,
        ProductFormSchema,
        ImageAttachmentSchema,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "products", description = "Inventory product management"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn object_has_field(schema: &RefOr<Schema>, field: &str) -> bool {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj.properties.contains_key(field),
            _ => false,
        }
    }

    #[rstest]
    #[case("Error", "traceId")]
    #[case("Error", "code")]
    #[case("ProductBody", "ownerId")]
    #[case("ProductBody", "createdAt")]
    #[case("ListProductsBody", "productsCount")]
    #[case("UpdateProductBody", "updatedProduct")]
    #[case("ProductForm", "image")]
    fn schemas_expose_camel_case_fields(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas.get(schema).expect("schema registered");
        assert!(object_has_field(found, field), "{schema} should have {field}");
    }

    #[rstest]
    #[case("/api/v1/products")]
    #[case("/api/v1/products/{id}")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn product_item_path_has_three_operations() {
        let doc = ApiDoc::openapi();
        let item = doc
            .paths
            .paths
            .get("/api/v1/products/{id}")
            .expect("item path");
        assert!(item.get.is_some());
        assert!(item.put.is_some());
        assert!(item.delete.is_some());
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
