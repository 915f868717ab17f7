//! Customer Domain
//!
//! Subscriber master data for the dairy distribution system: who gets
//! milk, how much per day, and whether their round is currently active.

pub mod customer;
pub mod error;

pub use customer::{Customer, CustomerUpdate, DeliveryStatus, MilkType};
pub use error::CustomerError;
