//! Comprehensive unit tests for the Temporal module
//!
//! Tests cover EffectiveSpan and BillingPeriod functionality.

use chrono::NaiveDate;
use core_kernel::temporal::TemporalError;
use core_kernel::{BillingPeriod, EffectiveSpan};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod effective_span {
    use super::*;

    mod creation {
        use super::*;

        #[test]
        fn test_new_creates_bounded_span() {
            let span = EffectiveSpan::new(date(2024, 1, 1), Some(date(2024, 12, 31))).unwrap();

            assert_eq!(span.from, date(2024, 1, 1));
            assert_eq!(span.to, Some(date(2024, 12, 31)));
        }

        #[test]
        fn test_new_with_none_end_is_open() {
            let span = EffectiveSpan::new(date(2024, 1, 1), None).unwrap();

            assert!(span.is_open());
            assert_eq!(span.to, None);
        }

        #[test]
        fn test_new_fails_when_end_before_start() {
            let result = EffectiveSpan::new(date(2024, 6, 1), Some(date(2024, 1, 1)));

            assert!(matches!(result, Err(TemporalError::InvalidPeriod { .. })));
        }

        #[test]
        fn test_single_day_span_is_valid() {
            let span = EffectiveSpan::new(date(2024, 6, 1), Some(date(2024, 6, 1))).unwrap();

            assert_eq!(span.len_days(), Some(1));
        }

        #[test]
        fn test_open_creates_unbounded_span() {
            let span = EffectiveSpan::open(date(2024, 3, 1));

            assert!(span.is_open());
            assert_eq!(span.from, date(2024, 3, 1));
        }

        #[test]
        fn test_bounded_creates_bounded_span() {
            let span = EffectiveSpan::bounded(date(2024, 1, 1), date(2024, 1, 31)).unwrap();

            assert!(!span.is_open());
            assert_eq!(span.len_days(), Some(31));
        }
    }

    mod containment {
        use super::*;

        #[test]
        fn test_contains_date_in_middle() {
            let span = EffectiveSpan::bounded(date(2024, 1, 1), date(2024, 12, 31)).unwrap();

            assert!(span.contains(date(2024, 6, 15)));
        }

        #[test]
        fn test_contains_start_date() {
            let span = EffectiveSpan::bounded(date(2024, 1, 1), date(2024, 12, 31)).unwrap();

            assert!(span.contains(date(2024, 1, 1)));
        }

        #[test]
        fn test_contains_end_date() {
            // Both ends are inclusive, unlike half-open timestamp ranges
            let span = EffectiveSpan::bounded(date(2024, 1, 1), date(2024, 12, 31)).unwrap();

            assert!(span.contains(date(2024, 12, 31)));
        }

        #[test]
        fn test_excludes_date_before_start() {
            let span = EffectiveSpan::bounded(date(2024, 1, 1), date(2024, 12, 31)).unwrap();

            assert!(!span.contains(date(2023, 12, 31)));
        }

        #[test]
        fn test_excludes_date_after_end() {
            let span = EffectiveSpan::bounded(date(2024, 1, 1), date(2024, 12, 31)).unwrap();

            assert!(!span.contains(date(2025, 1, 1)));
        }

        #[test]
        fn test_open_span_contains_far_future() {
            let span = EffectiveSpan::open(date(2024, 1, 1));

            assert!(span.contains(date(2099, 12, 31)));
        }
    }

    mod overlap {
        use super::*;

        #[test]
        fn test_overlapping_spans() {
            let a = EffectiveSpan::bounded(date(2024, 1, 1), date(2024, 6, 30)).unwrap();
            let b = EffectiveSpan::bounded(date(2024, 6, 1), date(2024, 12, 31)).unwrap();

            assert!(a.overlaps(&b));
            assert!(b.overlaps(&a));
        }

        #[test]
        fn test_non_overlapping_spans() {
            let a = EffectiveSpan::bounded(date(2024, 1, 1), date(2024, 6, 30)).unwrap();
            let b = EffectiveSpan::bounded(date(2024, 7, 1), date(2024, 12, 31)).unwrap();

            assert!(!a.overlaps(&b));
            assert!(!b.overlaps(&a));
        }

        #[test]
        fn test_spans_meeting_at_boundary_overlap() {
            // Inclusive ends mean sharing a single day counts as overlap
            let a = EffectiveSpan::bounded(date(2024, 1, 1), date(2024, 6, 30)).unwrap();
            let b = EffectiveSpan::bounded(date(2024, 6, 30), date(2024, 12, 31)).unwrap();

            assert!(a.overlaps(&b));
        }

        #[test]
        fn test_contained_span_overlaps() {
            let outer = EffectiveSpan::bounded(date(2024, 1, 1), date(2024, 12, 31)).unwrap();
            let inner = EffectiveSpan::bounded(date(2024, 3, 1), date(2024, 3, 31)).unwrap();

            assert!(outer.overlaps(&inner));
            assert!(inner.overlaps(&outer));
        }

        #[test]
        fn test_open_spans_overlap() {
            let a = EffectiveSpan::open(date(2024, 1, 1));
            let b = EffectiveSpan::open(date(2024, 6, 1));

            assert!(a.overlaps(&b));
        }
    }

    mod close_at {
        use super::*;

        #[test]
        fn test_close_at_success() {
            let mut span = EffectiveSpan::open(date(2024, 1, 1));

            span.close_at(date(2024, 6, 30)).unwrap();

            assert!(!span.is_open());
            assert_eq!(span.to, Some(date(2024, 6, 30)));
        }

        #[test]
        fn test_close_at_before_start_fails() {
            let mut span = EffectiveSpan::open(date(2024, 6, 1));

            let result = span.close_at(date(2024, 1, 1));

            assert!(result.is_err());
            assert!(span.is_open());
        }

        #[test]
        fn test_close_at_start_yields_single_day() {
            let mut span = EffectiveSpan::open(date(2024, 6, 1));

            span.close_at(date(2024, 6, 1)).unwrap();

            assert_eq!(span.len_days(), Some(1));
        }
    }

    mod length {
        use super::*;

        #[test]
        fn test_len_days_counts_both_ends() {
            let span = EffectiveSpan::bounded(date(2024, 1, 1), date(2024, 1, 31)).unwrap();

            assert_eq!(span.len_days(), Some(31));
        }

        #[test]
        fn test_len_days_open_returns_none() {
            let span = EffectiveSpan::open(date(2024, 1, 1));

            assert_eq!(span.len_days(), None);
        }
    }
}

mod billing_period {
    use super::*;

    #[test]
    fn test_new_creates_valid_period() {
        let period = BillingPeriod::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();

        assert_eq!(period.start, date(2024, 1, 1));
        assert_eq!(period.end, date(2024, 1, 31));
    }

    #[test]
    fn test_new_same_start_end_is_valid() {
        let period = BillingPeriod::new(date(2024, 1, 15), date(2024, 1, 15)).unwrap();

        assert_eq!(period.days(), 1);
    }

    #[test]
    fn test_new_fails_when_start_after_end() {
        let result = BillingPeriod::new(date(2024, 2, 1), date(2024, 1, 1));

        assert!(matches!(result, Err(TemporalError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_contains_date_in_period() {
        let period = BillingPeriod::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();

        assert!(period.contains(date(2024, 1, 15)));
    }

    #[test]
    fn test_contains_both_ends() {
        let period = BillingPeriod::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();

        assert!(period.contains(date(2024, 1, 1)));
        assert!(period.contains(date(2024, 1, 31)));
    }

    #[test]
    fn test_excludes_dates_outside() {
        let period = BillingPeriod::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();

        assert!(!period.contains(date(2023, 12, 31)));
        assert!(!period.contains(date(2024, 2, 1)));
    }

    #[test]
    fn test_days_calculation() {
        let period = BillingPeriod::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();

        assert_eq!(period.days(), 31);
    }

    mod month {
        use super::*;

        #[test]
        fn test_month_covers_whole_calendar_month() {
            let january = BillingPeriod::month(2024, 1).unwrap();

            assert_eq!(january.start, date(2024, 1, 1));
            assert_eq!(january.end, date(2024, 1, 31));
        }

        #[test]
        fn test_month_handles_leap_february() {
            let february = BillingPeriod::month(2024, 2).unwrap();

            assert_eq!(february.end, date(2024, 2, 29));
            assert_eq!(february.days(), 29);
        }

        #[test]
        fn test_month_handles_december_year_boundary() {
            let december = BillingPeriod::month(2023, 12).unwrap();

            assert_eq!(december.end, date(2023, 12, 31));
        }

        #[test]
        fn test_month_rejects_invalid_month() {
            assert!(BillingPeriod::month(2024, 13).is_err());
            assert!(BillingPeriod::month(2024, 0).is_err());
        }
    }
}

mod serialization {
    use super::*;

    #[test]
    fn test_effective_span_json_roundtrip() {
        let span = EffectiveSpan::bounded(date(2024, 1, 1), date(2024, 6, 30)).unwrap();

        let json = serde_json::to_string(&span).unwrap();
        let deserialized: EffectiveSpan = serde_json::from_str(&json).unwrap();

        assert_eq!(span, deserialized);
    }

    #[test]
    fn test_open_span_json_roundtrip() {
        let span = EffectiveSpan::open(date(2024, 1, 1));

        let json = serde_json::to_string(&span).unwrap();
        let deserialized: EffectiveSpan = serde_json::from_str(&json).unwrap();

        assert!(deserialized.is_open());
    }

    #[test]
    fn test_billing_period_json_roundtrip() {
        let period = BillingPeriod::month(2024, 1).unwrap();

        let json = serde_json::to_string(&period).unwrap();
        let deserialized: BillingPeriod = serde_json::from_str(&json).unwrap();

        assert_eq!(period, deserialized);
    }
}
