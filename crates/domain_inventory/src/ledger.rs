//! In-memory stock ledger
//!
//! Holds the balances of many products and applies signed quantity
//! events to them. Storage keeps one row per product with the same
//! semantics; this model is the reference the persistence layer and
//! the tests agree on.

use std::collections::HashMap;

use rust_decimal::Decimal;

use core_kernel::ProductId;

use crate::balance::StockBalance;

/// Running balances for a set of products
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    balances: HashMap<ProductId, StockBalance>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance for a product, zero when no row exists yet
    pub fn current_balance(&self, product_id: ProductId) -> Decimal {
        self.balances
            .get(&product_id)
            .map(|b| b.quantity)
            .unwrap_or(Decimal::ZERO)
    }

    /// Applies a signed delta, creating the balance lazily
    ///
    /// Returns the new quantity, floored at zero.
    pub fn apply_delta(&mut self, product_id: ProductId, delta: Decimal) -> Decimal {
        self.balances
            .entry(product_id)
            .or_insert_with(|| StockBalance::new(product_id))
            .apply_delta(delta)
    }

    /// Replaces one previously applied delta with another
    pub fn reverse_and_reapply(
        &mut self,
        product_id: ProductId,
        old_delta: Decimal,
        new_delta: Decimal,
    ) -> Decimal {
        self.apply_delta(product_id, new_delta - old_delta)
    }

    pub fn balance(&self, product_id: ProductId) -> Option<&StockBalance> {
        self.balances.get(&product_id)
    }
}
