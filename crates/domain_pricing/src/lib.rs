//! Pricing Domain
//!
//! This crate implements per-product price timelines for the dairy
//! distribution system. A product's price is a sequence of effective
//! intervals; exactly one interval is active at a time and the rest
//! remain as history so past deliveries stay auditable.
//!
//! # Key Concepts
//!
//! - **Price Interval**: one price over an inclusive span of days
//! - **Timeline**: a product's full interval history plus resolution rules
//! - **Price Change**: the planned mutations a newly recorded price implies
//!
//! Resolution answers "what did this product cost on day X" and is used
//! when pricing deliveries and when reporting inventory status.

pub mod interval;
pub mod timeline;
pub mod error;

pub use interval::PriceInterval;
pub use timeline::{PriceChange, PriceTimeline};
pub use error::PricingError;
