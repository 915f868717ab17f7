//! Inventory repository implementation
//!
//! This module provides database access for receipt events and per-product
//! stock balances. Every mutation runs in one transaction: the receipt row,
//! the balance movement, and any price recording commit together or not at
//! all. Balance rows are locked with `SELECT ... FOR UPDATE` so concurrent
//! movements serialize instead of losing updates.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use core_kernel::{ProductId, ReceiptId, StaffId};
use domain_inventory::{InventoryStatus, ReceiptEvent, StockBalance};

use crate::error::DatabaseError;
use crate::repositories::pricing::record_price_tx;

/// Repository for managing inventory receipts and stock balances
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a stock receipt for a product
    ///
    /// Inserts the receipt, credits the stock balance, and records the
    /// purchase price on the product's timeline as of the entry date,
    /// all in one transaction.
    ///
    /// # Arguments
    ///
    /// * `product_id` - The product received
    /// * `entry_date` - Day the stock arrived
    /// * `quantity` - Quantity received, strictly positive
    /// * `price_per_unit` - Purchase price per unit
    /// * `recorded_by` - Staff member recording the receipt
    ///
    /// # Returns
    ///
    /// The inventory status after the receipt
    pub async fn record_receipt(
        &self,
        product_id: ProductId,
        entry_date: NaiveDate,
        quantity: Decimal,
        price_per_unit: Decimal,
        recorded_by: StaffId,
    ) -> Result<InventoryStatus, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let product_name = product_name(&mut tx, product_id).await?;
        let receipt = ReceiptEvent::new(
            product_id,
            entry_date,
            quantity,
            price_per_unit,
            Some(recorded_by),
        )?;

        insert_receipt(&mut tx, &receipt).await?;
        let available = adjust_stock(&mut tx, product_id, quantity).await?;
        record_price_tx(&mut tx, product_id, price_per_unit, entry_date, Some(recorded_by))
            .await?;

        tx.commit().await?;

        Ok(InventoryStatus {
            product_id,
            product_name,
            date: entry_date,
            total_received: quantity,
            available,
            price_per_unit,
        })
    }

    /// Revises a previously recorded receipt
    ///
    /// The stock balance moves by the quantity difference only, so the
    /// original contribution is replaced rather than double counted.
    /// The revised price is recorded as of the revised entry date.
    ///
    /// # Arguments
    ///
    /// * `receipt_id` - The receipt to revise
    /// * `product_id` - Product the receipt must belong to
    /// * `entry_date` - Revised entry date
    /// * `quantity` - Revised quantity, strictly positive
    /// * `price_per_unit` - Revised purchase price
    pub async fn update_receipt(
        &self,
        receipt_id: ReceiptId,
        product_id: ProductId,
        entry_date: NaiveDate,
        quantity: Decimal,
        price_per_unit: Decimal,
    ) -> Result<InventoryStatus, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let row = fetch_receipt(&mut tx, receipt_id).await?;
        let receipt = row.into_domain();
        if receipt.product_id != product_id {
            return Err(DatabaseError::Validation(format!(
                "receipt '{}' does not belong to product '{}'",
                receipt_id, product_id
            )));
        }

        let product_name = product_name(&mut tx, product_id).await?;
        let (revised, delta) = receipt.revise(entry_date, quantity, price_per_unit)?;

        sqlx::query(
            r#"
            UPDATE receipt_events
            SET entry_date = $2, quantity = $3, price_per_unit = $4, updated_at = $5
            WHERE receipt_id = $1
            "#,
        )
        .bind(*revised.id.as_uuid())
        .bind(revised.entry_date)
        .bind(revised.quantity)
        .bind(revised.price_per_unit)
        .bind(revised.updated_at)
        .execute(&mut *tx)
        .await?;

        let available = adjust_stock(&mut tx, product_id, delta).await?;
        record_price_tx(&mut tx, product_id, price_per_unit, entry_date, revised.recorded_by)
            .await?;

        tx.commit().await?;

        Ok(InventoryStatus {
            product_id,
            product_name,
            date: entry_date,
            total_received: quantity,
            available,
            price_per_unit,
        })
    }

    /// Deletes a receipt and reverses its stock contribution
    ///
    /// The balance debit clamps at zero like any other; price history
    /// recorded by the receipt stays untouched.
    ///
    /// # Arguments
    ///
    /// * `receipt_id` - The receipt to delete
    pub async fn delete_receipt(&self, receipt_id: ReceiptId) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let row = fetch_receipt(&mut tx, receipt_id).await?;
        let receipt = row.into_domain();

        adjust_stock(&mut tx, receipt.product_id, -receipt.quantity).await?;
        sqlx::query("DELETE FROM receipt_events WHERE receipt_id = $1")
            .bind(*receipt.id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Retrieves the receipts recorded for a product, newest first
    ///
    /// # Arguments
    ///
    /// * `product_id` - The product identifier
    pub async fn receipts_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ReceiptEvent>, DatabaseError> {
        let rows = sqlx::query_as::<_, ReceiptRow>(
            r#"
            SELECT
                receipt_id,
                product_id,
                entry_date,
                quantity,
                price_per_unit,
                recorded_by,
                created_at,
                updated_at
            FROM receipt_events
            WHERE product_id = $1
            ORDER BY entry_date DESC, created_at DESC
            "#,
        )
        .bind(*product_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReceiptRow::into_domain).collect())
    }

    /// Retrieves the receipts recorded on a given day
    ///
    /// # Arguments
    ///
    /// * `entry_date` - The day to list
    pub async fn receipts_on(
        &self,
        entry_date: NaiveDate,
    ) -> Result<Vec<ReceiptEvent>, DatabaseError> {
        let rows = sqlx::query_as::<_, ReceiptRow>(
            r#"
            SELECT
                receipt_id,
                product_id,
                entry_date,
                quantity,
                price_per_unit,
                recorded_by,
                created_at,
                updated_at
            FROM receipt_events
            WHERE entry_date = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(entry_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReceiptRow::into_domain).collect())
    }

    /// Returns the current stock quantity for a product
    ///
    /// Products without a balance row report zero.
    ///
    /// # Arguments
    ///
    /// * `product_id` - The product identifier
    pub async fn current_stock(&self, product_id: ProductId) -> Result<Decimal, DatabaseError> {
        let quantity: Option<Decimal> = sqlx::query_scalar(
            "SELECT quantity FROM stock_balances WHERE product_id = $1",
        )
        .bind(*product_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(quantity.unwrap_or(Decimal::ZERO))
    }

    /// Retrieves the stock level of every catalog product
    ///
    /// Products that never moved stock report zero.
    pub async fn stock_levels(&self) -> Result<Vec<StockLevelRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, StockLevelRow>(
            r#"
            SELECT
                p.product_id,
                p.name,
                COALESCE(s.quantity, 0) AS quantity,
                s.updated_at
            FROM products p
            LEFT JOIN stock_balances s ON s.product_id = p.product_id
            ORDER BY p.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// Applies a signed stock delta inside the caller's transaction
///
/// Ensures the balance row exists, locks it, applies the delta through
/// the domain balance (which clamps debits at zero), and writes the
/// result back. Returns the new quantity.
pub(crate) async fn adjust_stock(
    conn: &mut PgConnection,
    product_id: ProductId,
    delta: Decimal,
) -> Result<Decimal, DatabaseError> {
    let row = lock_balance(conn, product_id).await?;
    let mut balance = StockBalance::restore(product_id, row.quantity, row.updated_at);
    let available = balance.apply_delta(delta);
    write_balance(conn, &balance).await?;
    Ok(available)
}

/// Overrides a product's stock quantity inside the caller's transaction
///
/// The manual-correction path on product updates; negative requests
/// floor at zero.
pub(crate) async fn override_stock(
    conn: &mut PgConnection,
    product_id: ProductId,
    quantity: Decimal,
) -> Result<Decimal, DatabaseError> {
    let row = lock_balance(conn, product_id).await?;
    let mut balance = StockBalance::restore(product_id, row.quantity, row.updated_at);
    let available = balance.set_quantity(quantity);
    write_balance(conn, &balance).await?;
    Ok(available)
}

/// Creates a zero balance row for a freshly registered product
pub(crate) async fn seed_balance(
    conn: &mut PgConnection,
    balance: &StockBalance,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO stock_balances (balance_id, product_id, quantity, updated_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(*balance.product_id.as_uuid())
    .bind(balance.quantity)
    .bind(balance.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Ensures the balance row exists and locks it for this transaction
async fn lock_balance(
    conn: &mut PgConnection,
    product_id: ProductId,
) -> Result<StockBalanceRow, DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO stock_balances (balance_id, product_id, quantity, updated_at)
        VALUES ($1, $2, 0, $3)
        ON CONFLICT (product_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(*product_id.as_uuid())
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    let row = sqlx::query_as::<_, StockBalanceRow>(
        r#"
        SELECT product_id, quantity, updated_at
        FROM stock_balances
        WHERE product_id = $1
        FOR UPDATE
        "#,
    )
    .bind(*product_id.as_uuid())
    .fetch_one(&mut *conn)
    .await?;

    Ok(row)
}

async fn write_balance(
    conn: &mut PgConnection,
    balance: &StockBalance,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        UPDATE stock_balances
        SET quantity = $2, updated_at = $3
        WHERE product_id = $1
        "#,
    )
    .bind(*balance.product_id.as_uuid())
    .bind(balance.quantity)
    .bind(balance.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn insert_receipt(
    conn: &mut PgConnection,
    receipt: &ReceiptEvent,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO receipt_events (
            receipt_id, product_id, entry_date, quantity,
            price_per_unit, recorded_by, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(*receipt.id.as_uuid())
    .bind(*receipt.product_id.as_uuid())
    .bind(receipt.entry_date)
    .bind(receipt.quantity)
    .bind(receipt.price_per_unit)
    .bind(receipt.recorded_by.map(|s| *s.as_uuid()))
    .bind(receipt.created_at)
    .bind(receipt.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn fetch_receipt(
    conn: &mut PgConnection,
    receipt_id: ReceiptId,
) -> Result<ReceiptRow, DatabaseError> {
    sqlx::query_as::<_, ReceiptRow>(
        r#"
        SELECT
            receipt_id,
            product_id,
            entry_date,
            quantity,
            price_per_unit,
            recorded_by,
            created_at,
            updated_at
        FROM receipt_events
        WHERE receipt_id = $1
        FOR UPDATE
        "#,
    )
    .bind(*receipt_id.as_uuid())
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DatabaseError::not_found("Receipt", receipt_id))
}

/// Resolves a product's display name, failing when the product is missing
pub(crate) async fn product_name(
    conn: &mut PgConnection,
    product_id: ProductId,
) -> Result<String, DatabaseError> {
    sqlx::query_scalar::<_, String>("SELECT name FROM products WHERE product_id = $1")
        .bind(*product_id.as_uuid())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Product", product_id))
}

/// Database row for a receipt event
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReceiptRow {
    pub receipt_id: Uuid,
    pub product_id: Uuid,
    pub entry_date: NaiveDate,
    pub quantity: Decimal,
    pub price_per_unit: Decimal,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReceiptRow {
    /// Converts the row into its domain representation
    pub fn into_domain(self) -> ReceiptEvent {
        ReceiptEvent {
            id: self.receipt_id.into(),
            product_id: self.product_id.into(),
            entry_date: self.entry_date,
            quantity: self.quantity,
            price_per_unit: self.price_per_unit,
            recorded_by: self.recorded_by.map(Into::into),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Database row for a stock balance
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StockBalanceRow {
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// Stock level joined with the product it belongs to
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StockLevelRow {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: Decimal,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_receipt_row_into_domain() {
        let row = ReceiptRow {
            receipt_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            entry_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            quantity: dec!(120.5),
            price_per_unit: dec!(88),
            recorded_by: Some(Uuid::new_v4()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let receipt = row.clone().into_domain();
        assert_eq!(*receipt.id.as_uuid(), row.receipt_id);
        assert_eq!(receipt.quantity, dec!(120.5));
        assert_eq!(receipt.recorded_by.map(|s| *s.as_uuid()), row.recorded_by);
    }
}
