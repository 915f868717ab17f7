//! Repository implementations for domain entities
//!
//! This module provides concrete repository implementations that handle
//! database access for each domain aggregate. Repositories encapsulate
//! SQL queries and map between database rows and domain types.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - Domain rules decide, SQL persists: rows are loaded into domain
//!   types and every state change goes through a domain constructor or
//!   method before it is written back
//! - Transaction support for multi-table operations
//! - Row-level locks where concurrent writers meet (stock balances,
//!   invoice settlement)

pub mod billing;
pub mod catalog;
pub mod customer;
pub mod inventory;
pub mod pricing;
pub mod sales;

pub use billing::{BillingRepository, InvoiceRow, NewInvoice, NewPayment};
pub use catalog::{CatalogRepository, NewProduct, ProductChanges};
pub use customer::{CustomerRepository, NewCustomer};
pub use inventory::{InventoryRepository, StockLevelRow};
pub use pricing::PricingRepository;
pub use sales::{NewDelivery, NewOrder, NewOrderItem, SalesRepository};
