//! Internal Diesel row types. Never exposed outside the persistence adapter.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::products;

/// Row struct for reading from the products table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub quantity: i64,
    pub price: f64,
    pub description: String,
    pub image: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating product records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub(crate) struct NewProductRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: &'a str,
    pub sku: &'a str,
    pub category: &'a str,
    pub quantity: i64,
    pub price: f64,
    pub description: &'a str,
    pub image: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for replacing the mutable product columns.
///
/// `id`, `owner_id`, `sku`, and `created_at` are absent so an update can never
/// rewrite them.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = products)]
pub(crate) struct ProductUpdate<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub quantity: i64,
    pub price: f64,
    pub description: &'a str,
    pub image: &'a serde_json::Value,
    pub updated_at: DateTime<Utc>,
}
