//! Database error types
//!
//! This module defines the error types that can occur during database operations,
//! providing meaningful error messages and proper error chaining.

use thiserror::Error;

/// Errors that can occur during database operations
///
/// This enum captures all possible database-related errors, including
/// connection issues, query failures, and constraint violations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Domain validation rejected the input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Generic SQL error
    #[error("SQL error: {0}")]
    SqlError(sqlx::Error),
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// # Arguments
    ///
    /// * `entity` - The type of entity (e.g., "Product", "Invoice")
    /// * `id` - The identifier that was not found
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("Product", "PRD-123");
    /// assert!(error.to_string().contains("Product"));
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    /// Creates a duplicate entry error
    ///
    /// # Arguments
    ///
    /// * `entity` - The type of entity
    /// * `field` - The field that caused the duplicate
    /// * `value` - The duplicate value
    pub fn duplicate(entity: &str, field: &str, value: impl std::fmt::Display) -> Self {
        DatabaseError::DuplicateEntry(format!(
            "{} with {} '{}' already exists",
            entity, field, value
        ))
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_)
                | DatabaseError::ForeignKeyViolation(_)
                | DatabaseError::ConstraintViolation(_)
        )
    }

    /// Checks if this error rejected the caller's input
    pub fn is_validation(&self) -> bool {
        matches!(self, DatabaseError::Validation(_))
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }
}

/// Converts SQLx errors to more specific DatabaseError variants
///
/// This impl analyzes the SQLx error and maps it to the appropriate
/// DatabaseError variant based on the PostgreSQL error code, so `?` on
/// any query surfaces unique-constraint conflicts as `DuplicateEntry`
/// rather than a generic SQL error.
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => {
                DatabaseError::NotFound("Record not found".to_string())
            }
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::Database(db_err) => {
                // PostgreSQL error codes
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => DatabaseError::DuplicateEntry(db_err.message().to_string()),
                        "23503" => {
                            DatabaseError::ForeignKeyViolation(db_err.message().to_string())
                        }
                        "23514" => {
                            DatabaseError::ConstraintViolation(db_err.message().to_string())
                        }
                        _ => DatabaseError::QueryFailed(db_err.message().to_string()),
                    }
                } else {
                    DatabaseError::QueryFailed(db_err.message().to_string())
                }
            }
            other => DatabaseError::SqlError(other),
        }
    }
}

impl From<core_kernel::TemporalError> for DatabaseError {
    fn from(error: core_kernel::TemporalError) -> Self {
        DatabaseError::Validation(error.to_string())
    }
}

impl From<domain_pricing::PricingError> for DatabaseError {
    fn from(error: domain_pricing::PricingError) -> Self {
        DatabaseError::Validation(error.to_string())
    }
}

impl From<domain_inventory::InventoryError> for DatabaseError {
    fn from(error: domain_inventory::InventoryError) -> Self {
        DatabaseError::Validation(error.to_string())
    }
}

impl From<domain_customer::CustomerError> for DatabaseError {
    fn from(error: domain_customer::CustomerError) -> Self {
        DatabaseError::Validation(error.to_string())
    }
}

impl From<domain_sales::SalesError> for DatabaseError {
    fn from(error: domain_sales::SalesError) -> Self {
        match error {
            domain_sales::SalesError::SerializationFailure(e) => {
                DatabaseError::SerializationError(e.to_string())
            }
            domain_sales::SalesError::NoActivePrice(product) => {
                DatabaseError::NotFound(format!("No active price for product '{product}'"))
            }
            other => DatabaseError::Validation(other.to_string()),
        }
    }
}

impl From<domain_billing::BillingError> for DatabaseError {
    fn from(error: domain_billing::BillingError) -> Self {
        DatabaseError::Validation(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_inventory::InventoryError;
    use domain_sales::SalesError;

    #[test]
    fn test_not_found_helper() {
        let error = DatabaseError::not_found("Receipt", "RCT-42");
        assert!(error.is_not_found());
        assert!(error.to_string().contains("Receipt"));
        assert!(error.to_string().contains("RCT-42"));
    }

    #[test]
    fn test_duplicate_helper() {
        let error = DatabaseError::duplicate("Product", "name", "Full Cream Milk");
        assert!(error.is_constraint_violation());
        assert!(error.to_string().contains("already exists"));
    }

    #[test]
    fn test_domain_validation_bridges() {
        let error: DatabaseError =
            InventoryError::InvalidQuantity("quantity must be positive, got -3".to_string())
                .into();
        assert!(error.is_validation());
    }

    #[test]
    fn test_missing_price_bridges_to_not_found() {
        let error: DatabaseError = SalesError::NoActivePrice("PRD-7".to_string()).into();
        assert!(error.is_not_found());
    }

    #[test]
    fn test_row_not_found_maps() {
        let error: DatabaseError = sqlx::Error::RowNotFound.into();
        assert!(error.is_not_found());
    }
}
