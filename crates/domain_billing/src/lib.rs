//! Billing Domain - Invoices and Payment Reconciliation
//!
//! This crate keeps the money side of the dairy rounds straight: what
//! each customer was billed for a period, what they have paid, and what
//! remains due.
//!
//! # Reconciliation Rules
//!
//! - `due = max(0, total − paid)` after every mutation
//! - Status derives from the amounts: paid ≥ total is `Paid`, any other
//!   positive amount is `Partial`, zero is `Pending`
//! - A payment addressed to no particular invoice settles the
//!   customer's oldest open invoice; with none open it stands alone
//! - The billing desk may force a status; forcing `Paid` settles the
//!   amounts, forcing `Partial`/`Pending` changes the tag only
//!
//! # Example
//!
//! ```rust
//! use domain_billing::invoice::{BilledDelivery, Invoice, InvoiceStatus};
//! use core_kernel::{BillingPeriod, CustomerId, DeliveryId};
//! use rust_decimal_macros::dec;
//!
//! let mut invoice = Invoice::issue(
//!     CustomerId::new_v7(),
//!     Some("INV-2024-0107".to_string()),
//!     BillingPeriod::month(2024, 1).unwrap(),
//!     vec![BilledDelivery {
//!         delivery_id: DeliveryId::new_v7(),
//!         quantity: dec!(20),
//!         amount: dec!(1000),
//!     }],
//! ).unwrap();
//!
//! invoice.apply_payment(dec!(400));
//! assert_eq!(invoice.status, InvoiceStatus::Partial);
//! assert_eq!(invoice.due_amount, dec!(600));
//! ```

pub mod invoice;
pub mod payment;
pub mod reconcile;
pub mod error;

pub use invoice::{apply_amounts, settlement_status, BilledDelivery, Invoice, InvoiceStatus};
pub use payment::{Payment, PaymentMethod};
pub use reconcile::{reconcile, select_open_invoice, PaymentOutcome};
pub use error::BillingError;
