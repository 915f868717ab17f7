//! Sales Domain
//!
//! This crate covers the two ways product leaves the dairy:
//!
//! - **Deliveries**: standing subscription drops, priced from the
//!   product's active price and billed later through invoices
//! - **Orders**: one-off counter sales that debit stock on fulfillment
//!
//! Line totals are computed once at sale time and never recomputed, so
//! historical records survive later price changes untouched.

pub mod delivery;
pub mod order;
pub mod error;

pub use delivery::{resolve_unit_price, DeliveryEvent};
pub use order::{
    decode_payment_metadata, encode_payment_metadata, Order, OrderItem, OrderStatus,
};
pub use error::SalesError;
