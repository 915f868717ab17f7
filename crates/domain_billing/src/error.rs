//! Billing domain errors

use thiserror::Error;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// Payment or adjustment amount out of range
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Invoice cannot be issued as requested
    #[error("Invalid invoice: {0}")]
    InvalidInvoice(String),
}
