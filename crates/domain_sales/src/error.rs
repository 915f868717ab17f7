//! Sales domain errors

use thiserror::Error;

/// Errors that can occur in the sales domain
#[derive(Debug, Error)]
pub enum SalesError {
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("No active price for product {0}")]
    NoActivePrice(String),

    #[error("Payment metadata encoding failed: {0}")]
    SerializationFailure(#[from] serde_json::Error),
}
