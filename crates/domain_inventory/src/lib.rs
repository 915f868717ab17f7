//! Inventory Domain
//!
//! This crate implements stock tracking for the dairy distribution
//! system: append-style receipt events and the running per-product
//! balance they feed.
//!
//! # Key Concepts
//!
//! - **Product**: a catalog entry every stock and price record references
//! - **Receipt Event**: milk received from a supplier on a given day
//! - **Stock Balance**: one non-negative running quantity per product
//! - **Stock Ledger**: the in-memory model of many balances
//!
//! # Clamping
//!
//! Debits floor the balance at zero rather than failing. An order for
//! more stock than is on hand still goes through and empties the
//! balance; availability is favored over strict inventory accuracy.

pub mod product;
pub mod receipt;
pub mod balance;
pub mod ledger;
pub mod status;
pub mod error;

pub use product::{Product, ProductCategory};
pub use receipt::ReceiptEvent;
pub use balance::StockBalance;
pub use ledger::StockLedger;
pub use status::InventoryStatus;
pub use error::InventoryError;

use rust_decimal::Decimal;

/// Applies a signed delta to a quantity, flooring the result at zero
///
/// # Example
///
/// ```rust
/// use domain_inventory::apply_clamped;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(apply_clamped(dec!(40), dec!(-100)), dec!(0));
/// assert_eq!(apply_clamped(dec!(40), dec!(10)), dec!(50));
/// ```
pub fn apply_clamped(current: Decimal, delta: Decimal) -> Decimal {
    (current + delta).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_apply_clamped() {
        assert_eq!(apply_clamped(dec!(10), dec!(5)), dec!(15));
        assert_eq!(apply_clamped(dec!(10), dec!(-10)), dec!(0));
        assert_eq!(apply_clamped(dec!(10), dec!(-10.01)), dec!(0));
        assert_eq!(apply_clamped(dec!(0), dec!(-1)), dec!(0));
    }
}
