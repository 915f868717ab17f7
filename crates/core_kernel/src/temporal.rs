//! Business-date handling types
//!
//! Everything in this system runs on whole-day granularity: prices take
//! effect on a date, receipts and deliveries happen on a date, invoices
//! cover a date range. These types make the inclusive-date semantics
//! explicit instead of scattering comparisons across the domain crates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod { start: String, end: String },
}

/// An inclusive date span with an optional open end
///
/// Used for price intervals: `from` is the first day the value applies,
/// `to` is the last day (inclusive), and `None` means the span is still
/// open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveSpan {
    /// First day the span covers (inclusive)
    pub from: NaiveDate,
    /// Last day the span covers (inclusive), None means open-ended
    pub to: Option<NaiveDate>,
}

impl EffectiveSpan {
    /// Creates a new span, validating that `to` is not before `from`
    pub fn new(from: NaiveDate, to: Option<NaiveDate>) -> Result<Self, TemporalError> {
        if let Some(to) = to {
            if to < from {
                return Err(TemporalError::InvalidPeriod {
                    start: from.to_string(),
                    end: to.to_string(),
                });
            }
        }
        Ok(Self { from, to })
    }

    /// Creates an open-ended span starting on the given date
    pub fn open(from: NaiveDate) -> Self {
        Self { from, to: None }
    }

    /// Creates a bounded span
    pub fn bounded(from: NaiveDate, to: NaiveDate) -> Result<Self, TemporalError> {
        Self::new(from, Some(to))
    }

    /// Returns true if this span covers the given date
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && self.to.map_or(true, |t| date <= t)
    }

    /// Returns true if this span overlaps another
    pub fn overlaps(&self, other: &EffectiveSpan) -> bool {
        let self_to = self.to.unwrap_or(NaiveDate::MAX);
        let other_to = other.to.unwrap_or(NaiveDate::MAX);

        self.from <= other_to && other.from <= self_to
    }

    /// Returns true if this span has no end date
    pub fn is_open(&self) -> bool {
        self.to.is_none()
    }

    /// Closes the span on the given date (inclusive)
    ///
    /// Closing on `from` itself is allowed and yields a single-day span.
    pub fn close_at(&mut self, date: NaiveDate) -> Result<(), TemporalError> {
        if date < self.from {
            return Err(TemporalError::InvalidPeriod {
                start: self.from.to_string(),
                end: date.to_string(),
            });
        }
        self.to = Some(date);
        Ok(())
    }

    /// Number of days the span covers, counting both ends, if bounded
    pub fn len_days(&self) -> Option<i64> {
        self.to.map(|t| (t - self.from).num_days() + 1)
    }
}

/// A closed date range for billing periods
///
/// Both ends are inclusive; an invoice for `[start, end]` bills every
/// delivery dated within the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BillingPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// A calendar month as a billing period
    pub fn month(year: i32, month: u32) -> Result<Self, TemporalError> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            TemporalError::InvalidPeriod {
                start: format!("{year}-{month:02}-01"),
                end: format!("{year}-{month:02}"),
            }
        })?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .map(|d| d.pred_opt().unwrap_or(d))
        .ok_or_else(|| TemporalError::InvalidPeriod {
            start: start.to_string(),
            end: format!("{year}-{month:02}"),
        })?;
        Self::new(start, end)
    }
}
