//! Counter orders
//!
//! Orders are one-off sales (shop counter, phone order) as opposed to
//! the standing subscription deliveries. Fulfilling an order debits the
//! stock balance per item; the payment gateway's opaque metadata rides
//! along as stored text.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use core_kernel::{CustomerId, OrderId, ProductId, StaffId};

use crate::error::SalesError;

/// Order lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Placed, not yet confirmed
    Pending,
    /// Confirmed and stock debited
    Confirmed,
    /// Handed over to the customer
    Delivered,
    /// Cancelled before handover
    Cancelled,
}

/// One product line within an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Ordered product
    pub product_id: ProductId,
    /// Quantity ordered, strictly positive
    pub quantity: Decimal,
    /// Price per unit at order time
    pub unit_price: Decimal,
    /// Line subtotal, `quantity × unit_price`
    pub subtotal: Decimal,
}

impl OrderItem {
    pub fn new(
        product_id: ProductId,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Result<Self, SalesError> {
        if quantity <= Decimal::ZERO {
            return Err(SalesError::InvalidQuantity(format!(
                "order item quantity must be positive, got {quantity}"
            )));
        }
        Ok(Self {
            product_id,
            quantity,
            unit_price,
            subtotal: quantity * unit_price,
        })
    }
}

/// A counter order with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier
    pub id: OrderId,
    /// Ordering customer, if known (walk-ins have none)
    pub customer_id: Option<CustomerId>,
    /// Lifecycle state
    pub status: OrderStatus,
    /// Sum of line subtotals
    pub total_amount: Decimal,
    /// Order lines
    pub items: Vec<OrderItem>,
    /// Opaque payment gateway payload
    pub payment_metadata: Option<serde_json::Value>,
    /// Staff member who took the order
    pub placed_by: Option<StaffId>,
    /// Day the order was placed
    pub order_date: DateTime<Utc>,
}

impl Order {
    /// Creates a pending order from its lines
    pub fn new(
        customer_id: Option<CustomerId>,
        items: Vec<OrderItem>,
        payment_metadata: Option<serde_json::Value>,
        placed_by: Option<StaffId>,
    ) -> Result<Self, SalesError> {
        if items.is_empty() {
            return Err(SalesError::InvalidOrder(
                "order must contain at least one item".to_string(),
            ));
        }
        let total_amount = items.iter().map(|i| i.subtotal).sum();
        Ok(Self {
            id: OrderId::new_v7(),
            customer_id,
            status: OrderStatus::Pending,
            total_amount,
            items,
            payment_metadata,
            placed_by,
            order_date: Utc::now(),
        })
    }

    /// The signed stock deltas fulfilling this order applies
    ///
    /// One debit per line, applied in line order; each lands on the
    /// balance with the usual floor at zero.
    pub fn fulfillment_debits(&self) -> impl Iterator<Item = (ProductId, Decimal)> + '_ {
        self.items.iter().map(|i| (i.product_id, -i.quantity))
    }
}

/// Encodes payment metadata for the TEXT storage column
///
/// Encoding failures abort the order; a payload we cannot write exactly
/// must not be stored half-formed.
pub fn encode_payment_metadata(
    metadata: Option<&serde_json::Value>,
) -> Result<Option<String>, SalesError> {
    metadata
        .map(|value| serde_json::to_string(value).map_err(SalesError::from))
        .transpose()
}

/// Decodes stored payment metadata
///
/// Reads are forgiving: a corrupt payload is dropped (logged) instead
/// of failing the lookup that happened to touch it.
pub fn decode_payment_metadata(raw: Option<&str>) -> Option<serde_json::Value> {
    let raw = raw?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(%error, "discarding unreadable payment metadata");
            None
        }
    }
}
