//! Per-product stock balance
//!
//! One balance row exists per product, created lazily the first time a
//! receipt or consumption touches it. Subtractions clamp at zero: an
//! oversized debit succeeds and leaves the balance empty instead of
//! failing the operation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::ProductId;

use crate::apply_clamped;

/// The running stock quantity for one product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockBalance {
    /// Product this balance tracks
    pub product_id: ProductId,
    /// Current available quantity, never negative
    pub quantity: Decimal,
    /// Last updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl StockBalance {
    /// Creates a fresh zero balance for a product
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            quantity: Decimal::ZERO,
            updated_at: Utc::now(),
        }
    }

    /// Restores a balance loaded from storage
    pub fn restore(product_id: ProductId, quantity: Decimal, updated_at: DateTime<Utc>) -> Self {
        Self {
            product_id,
            quantity,
            updated_at,
        }
    }

    /// Adds a signed delta to the balance, flooring the result at zero
    ///
    /// Returns the new quantity.
    pub fn apply_delta(&mut self, delta: Decimal) -> Decimal {
        let next = apply_clamped(self.quantity, delta);
        if delta < Decimal::ZERO && next != self.quantity + delta {
            debug!(
                product_id = %self.product_id,
                balance = %self.quantity,
                delta = %delta,
                "stock debit clamped at zero"
            );
        }
        self.quantity = next;
        self.updated_at = Utc::now();
        self.quantity
    }

    /// Replaces one previously applied delta with another
    ///
    /// Equivalent to applying `new_delta − old_delta`; used when a
    /// receipt is revised after its original quantity already counted.
    pub fn reverse_and_reapply(&mut self, old_delta: Decimal, new_delta: Decimal) -> Decimal {
        self.apply_delta(new_delta - old_delta)
    }

    /// Overrides the quantity directly, clamping negatives to zero
    ///
    /// Used by the manual stock-correction path on product updates.
    pub fn set_quantity(&mut self, quantity: Decimal) -> Decimal {
        self.quantity = quantity.max(Decimal::ZERO);
        self.updated_at = Utc::now();
        self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balance_starts_at_zero() {
        let balance = StockBalance::new(ProductId::new_v7());
        assert_eq!(balance.quantity, Decimal::ZERO);
    }

    #[test]
    fn test_apply_delta_accumulates() {
        let mut balance = StockBalance::new(ProductId::new_v7());
        assert_eq!(balance.apply_delta(dec!(100)), dec!(100));
        assert_eq!(balance.apply_delta(dec!(-30)), dec!(70));
        assert_eq!(balance.apply_delta(dec!(15.5)), dec!(85.5));
    }

    #[test]
    fn test_oversized_debit_clamps_at_zero() {
        let mut balance = StockBalance::new(ProductId::new_v7());
        balance.apply_delta(dec!(40));

        assert_eq!(balance.apply_delta(dec!(-100)), Decimal::ZERO);
        assert_eq!(balance.quantity, Decimal::ZERO);
    }

    #[test]
    fn test_reverse_and_reapply() {
        let mut balance = StockBalance::new(ProductId::new_v7());
        balance.apply_delta(dec!(100));

        // A receipt of 100 is revised down to 60.
        balance.reverse_and_reapply(dec!(100), dec!(60));
        assert_eq!(balance.quantity, dec!(60));
    }

    #[test]
    fn test_manual_override_floors_at_zero() {
        let mut balance = StockBalance::new(ProductId::new_v7());
        balance.apply_delta(dec!(10));

        assert_eq!(balance.set_quantity(dec!(250)), dec!(250));
        assert_eq!(balance.set_quantity(dec!(-5)), Decimal::ZERO);
    }
}
