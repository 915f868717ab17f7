//! Infrastructure Database Layer
//!
//! This crate provides the database infrastructure for the dairy
//! distribution system on PostgreSQL using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern, providing data access
//! abstractions that hide the database implementation details from the
//! domain layer. Repositories load rows into the domain types, route
//! every state change through the domain rules, and persist the result
//! inside a transaction.
//!
//! # Concurrency
//!
//! Writers that can race each other serialize on row locks: stock
//! adjustments lock a product's balance row, payment reconciliation
//! locks the target invoice. Concurrent price recordings are guarded by
//! a partial unique index on the single active interval per product.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PricingRepository};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/dairy")).await?;
//! let repo = PricingRepository::new(pool);
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repositories;
pub mod settings;

pub use error::DatabaseError;
pub use migrations::run_migrations;
pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use repositories::{
    BillingRepository, CatalogRepository, CustomerRepository, InventoryRepository,
    PricingRepository, SalesRepository,
};
pub use settings::StoreSettings;
