//! Core Kernel - Foundational types and utilities for the dairy distribution system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Typed identifiers for every aggregate
//! - Temporal types for whole-day effective spans and billing periods

pub mod temporal;
pub mod identifiers;

pub use temporal::{EffectiveSpan, BillingPeriod, TemporalError};
pub use identifiers::{
    ProductId, PriceIntervalId, ReceiptId, CustomerId, StaffId,
    DeliveryId, OrderId, InvoiceId, PaymentId,
};
