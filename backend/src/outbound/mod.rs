//! Outbound adapters implementing the driven domain ports.
//!
//! - **persistence**: PostgreSQL-backed product repository using Diesel.
//! - **memory**: process-local product repository for development and tests.
//! - **media**: image host clients.
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod media;
pub mod memory;
pub mod persistence;
