//! Customer deliveries
//!
//! A delivery is one drop of product to one customer on one day. The
//! line total is fixed at creation from the unit price in effect, so
//! later price changes never move historical amounts. Deliveries feed
//! invoicing; they do not touch the stock balance (subscription milk is
//! accounted separately from counter stock).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, DeliveryId, ProductId, StaffId};

use crate::error::SalesError;

/// A single delivered line, priced at delivery time
///
/// At most one delivery exists per (customer, product, date); storage
/// enforces the triple with a unique constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryEvent {
    /// Unique identifier
    pub id: DeliveryId,
    /// Receiving customer
    pub customer_id: CustomerId,
    /// Delivered product
    pub product_id: ProductId,
    /// Day of delivery
    pub delivery_date: NaiveDate,
    /// Quantity delivered, strictly positive
    pub quantity: Decimal,
    /// Price per unit charged
    pub unit_price: Decimal,
    /// Line total, `quantity × unit_price`
    pub total_amount: Decimal,
    /// Free-form notes from the driver
    pub notes: Option<String>,
    /// Staff member who made the delivery
    pub delivered_by: Option<StaffId>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl DeliveryEvent {
    /// Creates a delivery, computing the line total
    pub fn new(
        customer_id: CustomerId,
        product_id: ProductId,
        delivery_date: NaiveDate,
        quantity: Decimal,
        unit_price: Decimal,
        notes: Option<String>,
        delivered_by: Option<StaffId>,
    ) -> Result<Self, SalesError> {
        if quantity <= Decimal::ZERO {
            return Err(SalesError::InvalidQuantity(format!(
                "delivery quantity must be positive, got {quantity}"
            )));
        }
        Ok(Self {
            id: DeliveryId::new_v7(),
            customer_id,
            product_id,
            delivery_date,
            quantity,
            unit_price,
            total_amount: quantity * unit_price,
            notes,
            delivered_by,
            created_at: Utc::now(),
        })
    }

    /// The uniqueness triple storage enforces
    pub fn dedup_key(&self) -> (CustomerId, ProductId, NaiveDate) {
        (self.customer_id, self.product_id, self.delivery_date)
    }
}

/// Picks the unit price for a delivery
///
/// An explicit price from the caller wins; otherwise the price the
/// caller resolved from the product's timeline applies. With neither,
/// the delivery cannot be priced.
pub fn resolve_unit_price(
    product_id: ProductId,
    explicit: Option<Decimal>,
    active: Option<Decimal>,
) -> Result<Decimal, SalesError> {
    explicit
        .or(active)
        .ok_or_else(|| SalesError::NoActivePrice(product_id.to_string()))
}
