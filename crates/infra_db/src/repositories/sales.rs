//! Sales repository implementation
//!
//! This module provides database access for deliveries and counter
//! orders. Delivery pricing resolves against the product's active price
//! today when the caller gives none; order fulfillment debits stock per
//! item inside the order's transaction, clamping each balance at zero.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use core_kernel::{BillingPeriod, CustomerId, OrderId, ProductId, StaffId};
use domain_sales::{
    decode_payment_metadata, encode_payment_metadata, resolve_unit_price, DeliveryEvent, Order,
    OrderItem,
};

use crate::error::DatabaseError;
use crate::repositories::inventory::adjust_stock;
use crate::repositories::pricing::load_timeline;

/// Repository for managing deliveries and orders
#[derive(Debug, Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    /// Creates a new SalesRepository with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a delivery to a customer
    ///
    /// The delivery date defaults to today. An explicit unit price wins;
    /// otherwise the product's active price today applies, and with
    /// neither the delivery is rejected. A repeat of the same
    /// (customer, product, date) triple surfaces as a conflict.
    ///
    /// # Arguments
    ///
    /// * `new` - The delivery data
    ///
    /// # Returns
    ///
    /// The recorded delivery with its computed line total
    pub async fn create_delivery(&self, new: NewDelivery) -> Result<DeliveryEvent, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        ensure_customer_exists(&mut tx, new.customer_id).await?;
        ensure_product_exists(&mut tx, new.product_id).await?;

        let today = Utc::now().date_naive();
        let delivery_date = new.delivery_date.unwrap_or(today);
        let active = load_timeline(&mut tx, new.product_id)
            .await?
            .price_per_unit_on(today);
        let unit_price = resolve_unit_price(new.product_id, new.unit_price, active)?;

        let delivery = DeliveryEvent::new(
            new.customer_id,
            new.product_id,
            delivery_date,
            new.quantity,
            unit_price,
            new.notes,
            new.delivered_by,
        )?;

        sqlx::query(
            r#"
            INSERT INTO delivery_events (
                delivery_id, customer_id, product_id, delivery_date, quantity,
                unit_price, total_amount, notes, delivered_by, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(*delivery.id.as_uuid())
        .bind(*delivery.customer_id.as_uuid())
        .bind(*delivery.product_id.as_uuid())
        .bind(delivery.delivery_date)
        .bind(delivery.quantity)
        .bind(delivery.unit_price)
        .bind(delivery.total_amount)
        .bind(&delivery.notes)
        .bind(delivery.delivered_by.map(|s| *s.as_uuid()))
        .bind(delivery.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(delivery)
    }

    /// Places a counter order and fulfills it against stock
    ///
    /// Inserts the order and its items, then debits each item's
    /// quantity from the product's balance; oversized debits clamp at
    /// zero rather than failing the order. Payment metadata is stored
    /// as opaque text; a payload that fails to encode aborts the order.
    ///
    /// # Arguments
    ///
    /// * `new` - The order data
    ///
    /// # Returns
    ///
    /// The placed order with its computed totals
    pub async fn create_order(&self, new: NewOrder) -> Result<Order, DatabaseError> {
        let items = new
            .items
            .into_iter()
            .map(|i| OrderItem::new(i.product_id, i.quantity, i.unit_price))
            .collect::<Result<Vec<_>, _>>()?;
        let order = Order::new(new.customer_id, items, new.payment_metadata, new.placed_by)?;
        let payment_data = encode_payment_metadata(order.payment_metadata.as_ref())?;

        let mut tx = self.pool.begin().await?;

        if let Some(customer_id) = order.customer_id {
            ensure_customer_exists(&mut tx, customer_id).await?;
        }

        sqlx::query(
            r#"
            INSERT INTO orders (
                order_id, customer_id, status, total_amount,
                payment_data, placed_by, order_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(*order.id.as_uuid())
        .bind(order.customer_id.map(|c| *c.as_uuid()))
        .bind(OrderStatus::from(order.status))
        .bind(order.total_amount)
        .bind(&payment_data)
        .bind(order.placed_by.map(|s| *s.as_uuid()))
        .bind(order.order_date)
        .execute(&mut *tx)
        .await?;

        for item in &order.items {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    item_id, order_id, product_id, quantity, unit_price, subtotal
                ) VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(*order.id.as_uuid())
            .bind(*item.product_id.as_uuid())
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.subtotal)
            .execute(&mut *tx)
            .await?;
        }

        for (product_id, delta) in order.fulfillment_debits() {
            adjust_stock(&mut tx, product_id, delta).await?;
        }

        tx.commit().await?;
        Ok(order)
    }

    /// Retrieves an order with its items
    ///
    /// Unreadable payment metadata is dropped rather than failing the
    /// lookup.
    ///
    /// # Arguments
    ///
    /// * `order_id` - The order identifier
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, DatabaseError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT
                order_id,
                customer_id,
                status,
                total_amount,
                payment_data,
                placed_by,
                order_date
            FROM orders
            WHERE order_id = $1
            "#,
        )
        .bind(*order_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Order", order_id))?;

        let mut conn = self.pool.acquire().await?;
        let items = load_order_items(&mut conn, order_id).await?;
        Ok(row.into_domain(items))
    }

    /// Retrieves a customer's orders, newest first, items included
    ///
    /// # Arguments
    ///
    /// * `customer_id` - The customer identifier
    pub async fn orders_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, DatabaseError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT
                order_id,
                customer_id,
                status,
                total_amount,
                payment_data,
                placed_by,
                order_date
            FROM orders
            WHERE customer_id = $1
            ORDER BY order_date DESC
            "#,
        )
        .bind(*customer_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let mut conn = self.pool.acquire().await?;
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = load_order_items(&mut conn, row.order_id.into()).await?;
            orders.push(row.into_domain(items));
        }
        Ok(orders)
    }

    /// Retrieves a customer's deliveries, newest first
    ///
    /// # Arguments
    ///
    /// * `customer_id` - The customer identifier
    pub async fn deliveries_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<DeliveryEvent>, DatabaseError> {
        let rows = sqlx::query_as::<_, DeliveryRow>(
            r#"
            SELECT
                delivery_id,
                customer_id,
                product_id,
                delivery_date,
                quantity,
                unit_price,
                total_amount,
                notes,
                delivered_by,
                created_at
            FROM delivery_events
            WHERE customer_id = $1
            ORDER BY delivery_date DESC, created_at DESC
            "#,
        )
        .bind(*customer_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DeliveryRow::into_domain).collect())
    }

    /// Retrieves every delivery made on a given day
    ///
    /// # Arguments
    ///
    /// * `delivery_date` - The day to list
    pub async fn deliveries_on(
        &self,
        delivery_date: NaiveDate,
    ) -> Result<Vec<DeliveryEvent>, DatabaseError> {
        let rows = sqlx::query_as::<_, DeliveryRow>(
            r#"
            SELECT
                delivery_id,
                customer_id,
                product_id,
                delivery_date,
                quantity,
                unit_price,
                total_amount,
                notes,
                delivered_by,
                created_at
            FROM delivery_events
            WHERE delivery_date = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(delivery_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DeliveryRow::into_domain).collect())
    }

    /// Retrieves a customer's deliveries within a billing period
    ///
    /// The usual input for building an invoice.
    ///
    /// # Arguments
    ///
    /// * `customer_id` - The customer identifier
    /// * `period` - The billing period, both ends inclusive
    pub async fn deliveries_in_period(
        &self,
        customer_id: CustomerId,
        period: BillingPeriod,
    ) -> Result<Vec<DeliveryEvent>, DatabaseError> {
        let rows = sqlx::query_as::<_, DeliveryRow>(
            r#"
            SELECT
                delivery_id,
                customer_id,
                product_id,
                delivery_date,
                quantity,
                unit_price,
                total_amount,
                notes,
                delivered_by,
                created_at
            FROM delivery_events
            WHERE customer_id = $1 AND delivery_date BETWEEN $2 AND $3
            ORDER BY delivery_date ASC, created_at ASC
            "#,
        )
        .bind(*customer_id.as_uuid())
        .bind(period.start)
        .bind(period.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DeliveryRow::into_domain).collect())
    }
}

async fn load_order_items(
    conn: &mut PgConnection,
    order_id: OrderId,
) -> Result<Vec<OrderItem>, DatabaseError> {
    let rows = sqlx::query_as::<_, OrderItemRow>(
        r#"
        SELECT item_id, order_id, product_id, quantity, unit_price, subtotal
        FROM order_items
        WHERE order_id = $1
        ORDER BY item_id ASC
        "#,
    )
    .bind(*order_id.as_uuid())
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| OrderItem {
            product_id: r.product_id.into(),
            quantity: r.quantity,
            unit_price: r.unit_price,
            subtotal: r.subtotal,
        })
        .collect())
}

/// Verifies a customer exists before writing rows that reference it
pub(crate) async fn ensure_customer_exists(
    conn: &mut PgConnection,
    customer_id: CustomerId,
) -> Result<(), DatabaseError> {
    let found: Option<Uuid> =
        sqlx::query_scalar("SELECT customer_id FROM customers WHERE customer_id = $1")
            .bind(*customer_id.as_uuid())
            .fetch_optional(&mut *conn)
            .await?;

    found
        .map(|_| ())
        .ok_or_else(|| DatabaseError::not_found("Customer", customer_id))
}

async fn ensure_product_exists(
    conn: &mut PgConnection,
    product_id: ProductId,
) -> Result<(), DatabaseError> {
    let found: Option<Uuid> =
        sqlx::query_scalar("SELECT product_id FROM products WHERE product_id = $1")
            .bind(*product_id.as_uuid())
            .fetch_optional(&mut *conn)
            .await?;

    found
        .map(|_| ())
        .ok_or_else(|| DatabaseError::not_found("Product", product_id))
}

/// Order status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Delivered,
    Cancelled,
}

impl From<domain_sales::OrderStatus> for OrderStatus {
    fn from(status: domain_sales::OrderStatus) -> Self {
        match status {
            domain_sales::OrderStatus::Pending => OrderStatus::Pending,
            domain_sales::OrderStatus::Confirmed => OrderStatus::Confirmed,
            domain_sales::OrderStatus::Delivered => OrderStatus::Delivered,
            domain_sales::OrderStatus::Cancelled => OrderStatus::Cancelled,
        }
    }
}

impl From<OrderStatus> for domain_sales::OrderStatus {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => domain_sales::OrderStatus::Pending,
            OrderStatus::Confirmed => domain_sales::OrderStatus::Confirmed,
            OrderStatus::Delivered => domain_sales::OrderStatus::Delivered,
            OrderStatus::Cancelled => domain_sales::OrderStatus::Cancelled,
        }
    }
}

/// Database row for a delivery event
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeliveryRow {
    pub delivery_id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub delivery_date: NaiveDate,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub delivered_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl DeliveryRow {
    /// Converts the row into its domain representation
    pub fn into_domain(self) -> DeliveryEvent {
        DeliveryEvent {
            id: self.delivery_id.into(),
            customer_id: self.customer_id.into(),
            product_id: self.product_id.into(),
            delivery_date: self.delivery_date,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_amount: self.total_amount,
            notes: self.notes,
            delivered_by: self.delivered_by.map(Into::into),
            created_at: self.created_at,
        }
    }
}

/// Database row for an order
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub order_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub payment_data: Option<String>,
    pub placed_by: Option<Uuid>,
    pub order_date: DateTime<Utc>,
}

impl OrderRow {
    /// Converts the row and its loaded items into the domain order
    pub fn into_domain(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.order_id.into(),
            customer_id: self.customer_id.map(Into::into),
            status: self.status.into(),
            total_amount: self.total_amount,
            items,
            payment_metadata: decode_payment_metadata(self.payment_data.as_deref()),
            placed_by: self.placed_by.map(Into::into),
            order_date: self.order_date,
        }
    }
}

/// Database row for an order item
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItemRow {
    pub item_id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Data for recording a new delivery
#[derive(Debug, Clone)]
pub struct NewDelivery {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    /// Defaults to today when absent
    pub delivery_date: Option<NaiveDate>,
    pub quantity: Decimal,
    /// Explicit price; when absent the active price today applies
    pub unit_price: Option<Decimal>,
    pub notes: Option<String>,
    pub delivered_by: Option<StaffId>,
}

/// Data for placing a new order
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: Option<CustomerId>,
    pub items: Vec<NewOrderItem>,
    pub payment_metadata: Option<serde_json::Value>,
    pub placed_by: Option<StaffId>,
}

/// One line of a new order
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_row_into_domain_decodes_metadata() {
        let row = OrderRow {
            order_id: Uuid::new_v4(),
            customer_id: None,
            status: OrderStatus::Pending,
            total_amount: dec!(490.50),
            payment_data: Some(r#"{"gateway":"upi"}"#.to_string()),
            placed_by: None,
            order_date: Utc::now(),
        };

        let order = row.into_domain(vec![]);
        assert_eq!(
            order.payment_metadata,
            Some(serde_json::json!({"gateway": "upi"}))
        );
    }

    #[test]
    fn test_order_row_drops_corrupt_metadata() {
        let row = OrderRow {
            order_id: Uuid::new_v4(),
            customer_id: Some(Uuid::new_v4()),
            status: OrderStatus::Confirmed,
            total_amount: dec!(100),
            payment_data: Some("{not json".to_string()),
            placed_by: None,
            order_date: Utc::now(),
        };

        let order = row.into_domain(vec![]);
        assert_eq!(order.payment_metadata, None);
        assert_eq!(order.status, domain_sales::OrderStatus::Confirmed);
    }
}
