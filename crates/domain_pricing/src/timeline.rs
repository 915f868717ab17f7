//! Price timeline and resolution
//!
//! The timeline holds every price interval recorded for one product and
//! answers the two questions the rest of the system asks: what does the
//! product cost on a given day, and what has to change when a new price
//! is recorded.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{ProductId, StaffId};

use crate::error::PricingError;
use crate::interval::PriceInterval;

/// The full price history of a single product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTimeline {
    product_id: ProductId,
    intervals: Vec<PriceInterval>,
}

/// The storage mutations a recorded price implies
///
/// Produced by [`PriceTimeline::record_price`]; the repository persists
/// `closed` (if any) and `opened` inside one transaction.
#[derive(Debug, Clone)]
pub enum PriceChange {
    /// The active interval already carries the requested price
    Unchanged,
    /// The current interval ends and a new one begins
    Changed {
        /// Prior active interval, now superseded
        closed: Option<PriceInterval>,
        /// Freshly opened interval carrying the new price
        opened: PriceInterval,
    },
}

impl PriceTimeline {
    /// Creates an empty timeline for a product with no price history
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            intervals: Vec::new(),
        }
    }

    /// Builds a timeline from loaded intervals
    ///
    /// Every interval must belong to `product_id`.
    pub fn from_intervals(
        product_id: ProductId,
        intervals: Vec<PriceInterval>,
    ) -> Result<Self, PricingError> {
        if let Some(stray) = intervals.iter().find(|i| i.product_id != product_id) {
            return Err(PricingError::ProductMismatch(stray.product_id.to_string()));
        }
        Ok(Self {
            product_id,
            intervals,
        })
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn intervals(&self) -> &[PriceInterval] {
        &self.intervals
    }

    /// The currently active interval, if any
    ///
    /// Storage keeps at most one active interval per product; should
    /// history ever contain more, the newest one wins.
    pub fn current(&self) -> Option<&PriceInterval> {
        self.intervals
            .iter()
            .filter(|i| i.active)
            .max_by_key(|i| (i.span.from, i.created_at, *i.id.as_uuid()))
    }

    /// Resolves the interval that prices the given date
    ///
    /// An interval qualifies when its span has started by `date` and is
    /// either open-ended or ends on or after `date`. Among qualifying
    /// intervals the latest effective-from wins; any remaining tie falls
    /// back to recording order, so resolution is never ambiguous. On the
    /// day a change takes effect this selects the newly opened interval,
    /// not the one it closed.
    pub fn active_price_on(&self, date: NaiveDate) -> Option<&PriceInterval> {
        self.intervals
            .iter()
            .filter(|i| i.applies_on(date))
            .max_by_key(|i| (i.span.from, i.created_at, *i.id.as_uuid()))
    }

    /// Price per unit on the given date, if one is in effect
    pub fn price_per_unit_on(&self, date: NaiveDate) -> Option<Decimal> {
        self.active_price_on(date).map(|i| i.price_per_unit)
    }

    /// Plans the mutations for recording a price as of `effective_date`
    ///
    /// Recording the price the active interval already carries is a
    /// no-op, so replaying the same update cannot fragment the history.
    /// Otherwise the current interval is superseded on `effective_date`
    /// and a new open-ended interval starts the same day.
    pub fn record_price(
        &self,
        new_price: Decimal,
        effective_date: NaiveDate,
        recorded_by: Option<StaffId>,
    ) -> Result<PriceChange, PricingError> {
        if new_price <= Decimal::ZERO {
            return Err(PricingError::InvalidPrice(format!(
                "price per unit must be positive, got {new_price}"
            )));
        }

        let current = self.current();
        if let Some(current) = current {
            if current.price_per_unit == new_price {
                return Ok(PriceChange::Unchanged);
            }
        }

        let closed = match current {
            Some(current) => {
                let mut superseded = current.clone();
                superseded.supersede_at(effective_date)?;
                Some(superseded)
            }
            None => None,
        };
        let opened =
            PriceInterval::open(self.product_id, new_price, effective_date, recorded_by)?;

        debug!(
            product_id = %self.product_id,
            price = %new_price,
            effective_date = %effective_date,
            "price change planned"
        );

        Ok(PriceChange::Changed { closed, opened })
    }

    /// Applies a planned change to the in-memory timeline
    pub fn apply(&mut self, change: PriceChange) {
        if let PriceChange::Changed { closed, opened } = change {
            if let Some(closed) = closed {
                if let Some(slot) = self.intervals.iter_mut().find(|i| i.id == closed.id) {
                    *slot = closed;
                }
            }
            self.intervals.push(opened);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn timeline_with_price(price: Decimal, from: NaiveDate) -> PriceTimeline {
        let product_id = ProductId::new_v7();
        let interval = PriceInterval::open(product_id, price, from, None).unwrap();
        PriceTimeline::from_intervals(product_id, vec![interval]).unwrap()
    }

    #[test]
    fn test_empty_timeline_resolves_nothing() {
        let timeline = PriceTimeline::new(ProductId::new_v7());
        assert!(timeline.active_price_on(date(2024, 6, 1)).is_none());
        assert!(timeline.current().is_none());
    }

    #[test]
    fn test_recording_same_price_is_noop() {
        let timeline = timeline_with_price(dec!(185), date(2024, 1, 1));
        let change = timeline
            .record_price(dec!(185), date(2024, 6, 1), None)
            .unwrap();

        assert!(matches!(change, PriceChange::Unchanged));
    }

    #[test]
    fn test_recording_new_price_closes_current() {
        let mut timeline = timeline_with_price(dec!(185), date(2024, 1, 1));
        let change = timeline
            .record_price(dec!(195), date(2024, 6, 1), None)
            .unwrap();

        match &change {
            PriceChange::Changed { closed, opened } => {
                let closed = closed.as_ref().unwrap();
                assert!(!closed.active);
                assert_eq!(closed.span.to, Some(date(2024, 6, 1)));
                assert_eq!(opened.span.from, date(2024, 6, 1));
                assert_eq!(opened.price_per_unit, dec!(195));
                assert!(opened.active);
            }
            PriceChange::Unchanged => panic!("expected a change"),
        }

        timeline.apply(change);
        assert_eq!(timeline.intervals().len(), 2);
        assert_eq!(timeline.price_per_unit_on(date(2024, 6, 2)), Some(dec!(195)));
        assert_eq!(timeline.price_per_unit_on(date(2024, 5, 31)), Some(dec!(185)));
    }

    #[test]
    fn test_first_price_on_empty_timeline() {
        let timeline = PriceTimeline::new(ProductId::new_v7());
        let change = timeline
            .record_price(dec!(120), date(2024, 3, 1), None)
            .unwrap();

        match change {
            PriceChange::Changed { closed, opened } => {
                assert!(closed.is_none());
                assert_eq!(opened.price_per_unit, dec!(120));
            }
            PriceChange::Unchanged => panic!("expected a change"),
        }
    }

    #[test]
    fn test_mismatched_product_rejected() {
        let interval =
            PriceInterval::open(ProductId::new_v7(), dec!(50), date(2024, 1, 1), None).unwrap();
        let result = PriceTimeline::from_intervals(ProductId::new_v7(), vec![interval]);

        assert!(matches!(result, Err(PricingError::ProductMismatch(_))));
    }
}
