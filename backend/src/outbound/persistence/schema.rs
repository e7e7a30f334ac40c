//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Inventory products.
    ///
    /// Rows are owned by exactly one user and listed newest first through the
    /// `(owner_id, created_at DESC)` index.
    products (id) {
        /// Primary key: UUID v4 assigned at creation.
        id -> Uuid,
        /// Owning user.
        owner_id -> Uuid,
        name -> Text,
        sku -> Text,
        category -> Text,
        quantity -> Int8,
        price -> Float8,
        description -> Text,
        /// Image metadata; `{}` when no image is attached.
        image -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
