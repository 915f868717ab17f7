//! Price interval definition
//!
//! A price interval records what one product costs per unit over an
//! inclusive span of days. At most one interval per product is active
//! at a time; superseded intervals stay on record with `active = false`
//! so old deliveries keep their audit trail.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{EffectiveSpan, PriceIntervalId, ProductId, StaffId};

use crate::error::PricingError;

/// A single per-product price over an effective span of days
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceInterval {
    /// Unique identifier
    pub id: PriceIntervalId,
    /// Product this price applies to
    pub product_id: ProductId,
    /// Price per unit (litre, packet, ...)
    pub price_per_unit: Decimal,
    /// Days the interval covers, inclusive on both ends
    pub span: EffectiveSpan,
    /// Whether this is the current interval for the product
    pub active: bool,
    /// Staff member who recorded the price
    pub recorded_by: Option<StaffId>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl PriceInterval {
    /// Opens a new active interval starting on `effective_from`
    ///
    /// # Arguments
    ///
    /// * `product_id` - Product the price applies to
    /// * `price_per_unit` - Must be strictly positive
    /// * `effective_from` - First day the price applies
    pub fn open(
        product_id: ProductId,
        price_per_unit: Decimal,
        effective_from: NaiveDate,
        recorded_by: Option<StaffId>,
    ) -> Result<Self, PricingError> {
        if price_per_unit <= Decimal::ZERO {
            return Err(PricingError::InvalidPrice(format!(
                "price per unit must be positive, got {price_per_unit}"
            )));
        }
        Ok(Self {
            id: PriceIntervalId::new_v7(),
            product_id,
            price_per_unit,
            span: EffectiveSpan::open(effective_from),
            active: true,
            recorded_by,
            created_at: Utc::now(),
        })
    }

    /// Returns true if this interval prices the given date
    ///
    /// Superseded intervals still price the days their span covers, so
    /// historical dates keep resolving to the price in force back then.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.span.contains(date)
    }

    /// Supersedes this interval as of `date`
    ///
    /// The span closes on `date` (its last covered day) and the interval
    /// drops out of the current-price slot. Dates up to `date` still
    /// resolve through it.
    pub fn supersede_at(&mut self, date: NaiveDate) -> Result<(), PricingError> {
        self.span.close_at(date)?;
        self.active = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_open_interval() {
        let interval = PriceInterval::open(
            ProductId::new_v7(),
            dec!(185.50),
            date(2024, 6, 1),
            None,
        )
        .unwrap();

        assert!(interval.active);
        assert!(interval.span.is_open());
        assert!(interval.applies_on(date(2024, 6, 1)));
        assert!(interval.applies_on(date(2025, 1, 1)));
        assert!(!interval.applies_on(date(2024, 5, 31)));
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let zero = PriceInterval::open(ProductId::new_v7(), dec!(0), date(2024, 6, 1), None);
        let negative = PriceInterval::open(ProductId::new_v7(), dec!(-10), date(2024, 6, 1), None);

        assert!(matches!(zero, Err(PricingError::InvalidPrice(_))));
        assert!(matches!(negative, Err(PricingError::InvalidPrice(_))));
    }

    #[test]
    fn test_superseded_interval_covers_only_its_span() {
        let mut interval =
            PriceInterval::open(ProductId::new_v7(), dec!(90), date(2024, 6, 1), None).unwrap();
        interval.supersede_at(date(2024, 6, 10)).unwrap();

        assert!(!interval.active);
        assert_eq!(interval.span.to, Some(date(2024, 6, 10)));
        // Historical days stay priced through the closed span.
        assert!(interval.applies_on(date(2024, 6, 5)));
        assert!(interval.applies_on(date(2024, 6, 10)));
        assert!(!interval.applies_on(date(2024, 6, 11)));
    }
}
