//! Inventory status snapshot

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::ProductId;

/// The state of a product's inventory after a receipt operation
///
/// Returned by the receipt processors so callers can render the result
/// without a second read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryStatus {
    /// Product the snapshot describes
    pub product_id: ProductId,
    /// Product display name
    pub product_name: String,
    /// Day of the triggering receipt
    pub date: NaiveDate,
    /// Quantity the triggering receipt contributed
    pub total_received: Decimal,
    /// Stock available after the operation
    pub available: Decimal,
    /// Active price per unit after the operation
    pub price_per_unit: Decimal,
}
