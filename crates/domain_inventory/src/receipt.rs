//! Inventory receipt events
//!
//! A receipt records milk arriving from a supplier: how much, on which
//! day, and at what purchase price per litre. Receipts feed the stock
//! balance (additive) and may move the product's price timeline.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ProductId, ReceiptId, StaffId};

use crate::error::InventoryError;

/// A recorded inventory receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptEvent {
    /// Unique identifier
    pub id: ReceiptId,
    /// Product received
    pub product_id: ProductId,
    /// Day the stock arrived
    pub entry_date: NaiveDate,
    /// Quantity received, strictly positive
    pub quantity: Decimal,
    /// Purchase price per unit on that day
    pub price_per_unit: Decimal,
    /// Staff member who recorded the receipt
    pub recorded_by: Option<StaffId>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Last updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl ReceiptEvent {
    /// Creates a new receipt, validating quantity and price
    pub fn new(
        product_id: ProductId,
        entry_date: NaiveDate,
        quantity: Decimal,
        price_per_unit: Decimal,
        recorded_by: Option<StaffId>,
    ) -> Result<Self, InventoryError> {
        validate_quantity(quantity)?;
        validate_price(price_per_unit)?;
        let now = Utc::now();
        Ok(Self {
            id: ReceiptId::new_v7(),
            product_id,
            entry_date,
            quantity,
            price_per_unit,
            recorded_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Produces the revised receipt and the stock delta the revision implies
    ///
    /// The delta is `new quantity − old quantity`: applying it to the
    /// balance reverses the original contribution and applies the new
    /// one in a single step.
    pub fn revise(
        &self,
        entry_date: NaiveDate,
        quantity: Decimal,
        price_per_unit: Decimal,
    ) -> Result<(Self, Decimal), InventoryError> {
        validate_quantity(quantity)?;
        validate_price(price_per_unit)?;
        let delta = quantity - self.quantity;
        let mut revised = self.clone();
        revised.entry_date = entry_date;
        revised.quantity = quantity;
        revised.price_per_unit = price_per_unit;
        revised.updated_at = Utc::now();
        Ok((revised, delta))
    }
}

pub(crate) fn validate_quantity(quantity: Decimal) -> Result<(), InventoryError> {
    if quantity <= Decimal::ZERO {
        return Err(InventoryError::InvalidQuantity(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_price(price: Decimal) -> Result<(), InventoryError> {
    if price <= Decimal::ZERO {
        return Err(InventoryError::InvalidPrice(format!(
            "price per unit must be positive, got {price}"
        )));
    }
    Ok(())
}
