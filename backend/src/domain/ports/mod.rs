//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`ProductRepository`, `ImageHost`) are implemented by
//! outbound adapters; driving ports (`ProductCommand`, `ProductQuery`) are
//! what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod image_host;
mod product_command;
mod product_query;
mod product_repository;

#[cfg(test)]
pub use image_host::MockImageHost;
pub use image_host::{
    FixtureImageHost, HostedImage, ImageHost, ImageHostError, ImageUpload, ResourceType,
};
#[cfg(test)]
pub use product_command::MockProductCommand;
pub use product_command::{
    CreateProductRequest, CreateProductResponse, DeleteProductRequest, DeleteProductResponse,
    FixtureProductCommand, ProductCommand, ProductPayload, UpdateProductRequest,
    UpdateProductResponse, UploadedImage,
};
#[cfg(test)]
pub use product_query::MockProductQuery;
pub use product_query::{
    FixtureProductQuery, GetProductRequest, GetProductResponse, ListProductsRequest,
    ListProductsResponse, ProductQuery,
};
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{
    FixtureProductRepository, ProductRepository, ProductRepositoryError,
};
