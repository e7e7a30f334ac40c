//! PostgreSQL-backed `ProductRepository` implementation using Diesel ORM.
//!
//! Rows are decoded through `Product::new`, so a row that violates the
//! product invariants surfaces as a query error rather than a bad payload.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{
    ImageAttachment, Product, ProductDetails, ProductDraft, ProductId, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewProductRow, ProductRow, ProductUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::products;

/// Diesel-backed implementation of the product repository port.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProductRepositoryError {
    map_basic_pool_error(error, ProductRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ProductRepositoryError {
    map_basic_diesel_error(
        error,
        ProductRepositoryError::query,
        ProductRepositoryError::connection,
    )
}

fn encode_image(image: &ImageAttachment) -> Result<serde_json::Value, ProductRepositoryError> {
    serde_json::to_value(image)
        .map_err(|err| ProductRepositoryError::query(format!("serialise image: {err}")))
}

fn row_to_product(row: ProductRow) -> Result<Product, ProductRepositoryError> {
    let ProductRow {
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
    } = row;

    let image: ImageAttachment = serde_json::from_value(image)
        .map_err(|err| ProductRepositoryError::query(format!("decode image for {id}: {err}")))?;

    Product::new(ProductDraft {
        id: ProductId::from_uuid(id),
        owner_id: UserId::from_uuid(owner_id),
        details: ProductDetails {
            name,
            sku,
            category,
            quantity,
            price,
            description,
        },
        image,
        created_at,
        updated_at,
    })
    .map_err(|err| ProductRepositoryError::query(format!("invalid product row {id}: {err}")))
}

fn rows_to_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, ProductRepositoryError> {
    rows.into_iter().map(row_to_product).collect()
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProductRow> = products::table
            .filter(products::owner_id.eq(owner.as_uuid()))
            .order((products::created_at.desc(), products::id.desc()))
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_products(rows)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = products::table
            .filter(products::id.eq(id.as_uuid()))
            .select(ProductRow::as_select())
            .first::<ProductRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_product).transpose()
    }

    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        let image = encode_image(product.image())?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewProductRow {
            id: *product.id().as_uuid(),
            owner_id: *product.owner_id().as_uuid(),
            name: product.name(),
            sku: product.sku(),
            category: product.category(),
            quantity: product.quantity(),
            price: product.price(),
            description: product.description(),
            image: &image,
            created_at: product.created_at(),
            updated_at: product.updated_at(),
        };

        diesel::insert_into(products::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn replace(&self, product: &Product) -> Result<bool, ProductRepositoryError> {
        let image = encode_image(product.image())?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = ProductUpdate {
            name: product.name(),
            category: product.category(),
            quantity: product.quantity(),
            price: product.price(),
            description: product.description(),
            image: &image,
            updated_at: product.updated_at(),
        };

        let updated = diesel::update(products::table.filter(products::id.eq(product.id().as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(products::table.filter(products::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
