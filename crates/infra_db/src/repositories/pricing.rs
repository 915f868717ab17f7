//! Price interval repository implementation
//!
//! This module provides database access for per-product price history.
//! Intervals are append-mostly: recording a new price closes the active
//! interval and opens a new one inside a single transaction, so history
//! never has a gap or an overlap.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use core_kernel::{EffectiveSpan, ProductId, StaffId};
use domain_pricing::{PriceChange, PriceInterval, PriceTimeline};

use crate::error::DatabaseError;

/// Repository for managing product price history
///
/// All price decisions (resolution, supersession, idempotent re-record)
/// are made by [`PriceTimeline`]; this repository loads the history,
/// asks the timeline, and persists what it answers.
#[derive(Debug, Clone)]
pub struct PricingRepository {
    pool: PgPool,
}

impl PricingRepository {
    /// Creates a new PricingRepository with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads the full price timeline for a product
    ///
    /// # Arguments
    ///
    /// * `product_id` - The product identifier
    pub async fn timeline(&self, product_id: ProductId) -> Result<PriceTimeline, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        load_timeline(&mut conn, product_id).await
    }

    /// Resolves the interval pricing a product on the given date
    ///
    /// Returns `None` when no active interval covers the date.
    ///
    /// # Arguments
    ///
    /// * `product_id` - The product identifier
    /// * `date` - The day to price
    pub async fn active_price_on(
        &self,
        product_id: ProductId,
        date: NaiveDate,
    ) -> Result<Option<PriceInterval>, DatabaseError> {
        let timeline = self.timeline(product_id).await?;
        Ok(timeline.active_price_on(date).cloned())
    }

    /// Retrieves the recorded price history for a product
    ///
    /// Intervals are returned oldest first, superseded ones included.
    ///
    /// # Arguments
    ///
    /// * `product_id` - The product identifier
    pub async fn price_history(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<PriceInterval>, DatabaseError> {
        let timeline = self.timeline(product_id).await?;
        Ok(timeline.intervals().to_vec())
    }

    /// Records a price for a product as of an effective date
    ///
    /// Re-recording the price already in effect is a no-op and returns
    /// [`PriceChange::Unchanged`]. Otherwise the active interval closes
    /// on `effective_date` and a new open-ended interval starts the
    /// same day, atomically.
    ///
    /// # Arguments
    ///
    /// * `product_id` - The product identifier
    /// * `price_per_unit` - The new price, strictly positive
    /// * `effective_date` - First day the price applies
    /// * `recorded_by` - Staff member recording the price
    pub async fn record_price(
        &self,
        product_id: ProductId,
        price_per_unit: Decimal,
        effective_date: NaiveDate,
        recorded_by: Option<StaffId>,
    ) -> Result<PriceChange, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let known: Option<Uuid> =
            sqlx::query_scalar("SELECT product_id FROM products WHERE product_id = $1")
                .bind(*product_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;
        if known.is_none() {
            return Err(DatabaseError::not_found("Product", product_id));
        }

        let change =
            record_price_tx(&mut tx, product_id, price_per_unit, effective_date, recorded_by)
                .await?;
        tx.commit().await?;
        Ok(change)
    }
}

/// Loads a product's intervals into a timeline on an open connection
pub(crate) async fn load_timeline(
    conn: &mut PgConnection,
    product_id: ProductId,
) -> Result<PriceTimeline, DatabaseError> {
    let rows = sqlx::query_as::<_, PriceIntervalRow>(
        r#"
        SELECT
            interval_id,
            product_id,
            price_per_unit,
            effective_from,
            effective_to,
            is_active,
            recorded_by,
            created_at
        FROM price_intervals
        WHERE product_id = $1
        ORDER BY effective_from ASC, created_at ASC
        "#,
    )
    .bind(*product_id.as_uuid())
    .fetch_all(&mut *conn)
    .await?;

    let intervals = rows.into_iter().map(PriceIntervalRow::into_domain).collect();
    Ok(PriceTimeline::from_intervals(product_id, intervals)?)
}

/// Plans and persists a price change inside the caller's transaction
///
/// Shared by the standalone record operation and the receipt/product
/// flows that move prices as part of their own transactions. A partial
/// unique index on `(product_id) WHERE is_active AND effective_to IS
/// NULL` turns concurrent recorders into a conflict instead of two
/// active intervals.
pub(crate) async fn record_price_tx(
    conn: &mut PgConnection,
    product_id: ProductId,
    price_per_unit: Decimal,
    effective_date: NaiveDate,
    recorded_by: Option<StaffId>,
) -> Result<PriceChange, DatabaseError> {
    let timeline = load_timeline(conn, product_id).await?;
    let change = timeline.record_price(price_per_unit, effective_date, recorded_by)?;

    if let PriceChange::Changed { closed, opened } = &change {
        if let Some(closed) = closed {
            sqlx::query(
                r#"
                UPDATE price_intervals
                SET effective_to = $2, is_active = false
                WHERE interval_id = $1
                "#,
            )
            .bind(*closed.id.as_uuid())
            .bind(closed.span.to)
            .execute(&mut *conn)
            .await?;
        }
        insert_interval(conn, opened).await?;
    }

    Ok(change)
}

async fn insert_interval(
    conn: &mut PgConnection,
    interval: &PriceInterval,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO price_intervals (
            interval_id, product_id, price_per_unit, effective_from,
            effective_to, is_active, recorded_by, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(*interval.id.as_uuid())
    .bind(*interval.product_id.as_uuid())
    .bind(interval.price_per_unit)
    .bind(interval.span.from)
    .bind(interval.span.to)
    .bind(interval.active)
    .bind(interval.recorded_by.map(|s| *s.as_uuid()))
    .bind(interval.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Database row for a price interval
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PriceIntervalRow {
    pub interval_id: Uuid,
    pub product_id: Uuid,
    pub price_per_unit: Decimal,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
    pub is_active: bool,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl PriceIntervalRow {
    /// Converts the row into its domain representation
    pub fn into_domain(self) -> PriceInterval {
        PriceInterval {
            id: self.interval_id.into(),
            product_id: self.product_id.into(),
            price_per_unit: self.price_per_unit,
            span: EffectiveSpan {
                from: self.effective_from,
                to: self.effective_to,
            },
            active: self.is_active,
            recorded_by: self.recorded_by.map(Into::into),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_row_into_domain() {
        let row = PriceIntervalRow {
            interval_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            price_per_unit: dec!(185.50),
            effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            effective_to: Some(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()),
            is_active: false,
            recorded_by: None,
            created_at: Utc::now(),
        };

        let interval = row.clone().into_domain();
        assert_eq!(*interval.id.as_uuid(), row.interval_id);
        assert_eq!(interval.span.from, row.effective_from);
        assert_eq!(interval.span.to, row.effective_to);
        assert!(!interval.active);
    }
}
