//! Customer domain errors

use thiserror::Error;

/// Errors that can occur in the customer domain
#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("Invalid customer data: {0}")]
    Validation(String),

    #[error("Invalid daily quantity: {0}")]
    InvalidQuantity(String),
}

impl From<validator::ValidationErrors> for CustomerError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CustomerError::Validation(errors.to_string())
    }
}
