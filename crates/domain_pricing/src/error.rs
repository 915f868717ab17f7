//! Pricing domain errors

use thiserror::Error;

use core_kernel::TemporalError;

/// Errors that can occur in the pricing domain
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Interval does not belong to product {0}")]
    ProductMismatch(String),

    #[error(transparent)]
    Temporal(#[from] TemporalError),
}
