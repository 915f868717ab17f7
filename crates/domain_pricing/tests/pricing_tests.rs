//! Comprehensive tests for domain_pricing

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::ProductId;

use domain_pricing::error::PricingError;
use domain_pricing::interval::PriceInterval;
use domain_pricing::timeline::{PriceChange, PriceTimeline};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Resolution Tests
// ============================================================================

mod resolution_tests {
    use super::*;

    #[test]
    fn test_open_interval_covers_all_later_dates() {
        let product = ProductId::new_v7();
        let interval = PriceInterval::open(product, dec!(185), date(2024, 1, 15), None).unwrap();
        let timeline = PriceTimeline::from_intervals(product, vec![interval]).unwrap();

        assert_eq!(timeline.price_per_unit_on(date(2024, 1, 15)), Some(dec!(185)));
        assert_eq!(timeline.price_per_unit_on(date(2026, 7, 1)), Some(dec!(185)));
        assert_eq!(timeline.price_per_unit_on(date(2024, 1, 14)), None);
    }

    #[test]
    fn test_superseded_interval_prices_only_its_own_days() {
        let product = ProductId::new_v7();
        let mut old = PriceInterval::open(product, dec!(90), date(2024, 1, 1), None).unwrap();
        old.supersede_at(date(2024, 3, 1)).unwrap();
        let new = PriceInterval::open(product, dec!(95), date(2024, 3, 1), None).unwrap();
        let timeline = PriceTimeline::from_intervals(product, vec![old, new]).unwrap();

        // 2024-03-01 sits inside both spans; the newer effective-from wins.
        assert_eq!(timeline.price_per_unit_on(date(2024, 3, 1)), Some(dec!(95)));
        assert_eq!(timeline.price_per_unit_on(date(2024, 3, 2)), Some(dec!(95)));
        // Days before the change keep the price that was in force.
        assert_eq!(timeline.price_per_unit_on(date(2024, 2, 15)), Some(dec!(90)));
    }

    #[test]
    fn test_latest_effective_from_wins_among_active() {
        // Storage normally forbids two active intervals; if history is
        // dirty the later effective-from must win deterministically.
        let product = ProductId::new_v7();
        let older = PriceInterval::open(product, dec!(100), date(2024, 1, 1), None).unwrap();
        let newer = PriceInterval::open(product, dec!(110), date(2024, 2, 1), None).unwrap();
        let timeline = PriceTimeline::from_intervals(product, vec![newer, older]).unwrap();

        assert_eq!(timeline.price_per_unit_on(date(2024, 6, 1)), Some(dec!(110)));
        assert_eq!(timeline.price_per_unit_on(date(2024, 1, 20)), Some(dec!(100)));
    }

    #[test]
    fn test_future_interval_not_selected_early() {
        let product = ProductId::new_v7();
        let interval = PriceInterval::open(product, dec!(200), date(2024, 9, 1), None).unwrap();
        let timeline = PriceTimeline::from_intervals(product, vec![interval]).unwrap();

        assert!(timeline.active_price_on(date(2024, 8, 31)).is_none());
        assert!(timeline.active_price_on(date(2024, 9, 1)).is_some());
    }

    #[test]
    fn test_empty_timeline_has_no_price() {
        let timeline = PriceTimeline::new(ProductId::new_v7());
        assert!(timeline.active_price_on(date(2024, 1, 1)).is_none());
    }
}

// ============================================================================
// Recording Tests
// ============================================================================

mod recording_tests {
    use super::*;

    #[test]
    fn test_price_history_chains_across_changes() {
        let product = ProductId::new_v7();
        let mut timeline = PriceTimeline::new(product);

        let first = timeline.record_price(dec!(50), date(2024, 1, 1), None).unwrap();
        timeline.apply(first);
        let second = timeline.record_price(dec!(55), date(2024, 2, 10), None).unwrap();
        timeline.apply(second);
        let third = timeline.record_price(dec!(52), date(2024, 4, 1), None).unwrap();
        timeline.apply(third);

        assert_eq!(timeline.intervals().len(), 3);
        assert_eq!(timeline.price_per_unit_on(date(2024, 1, 15)), Some(dec!(50)));
        assert_eq!(timeline.price_per_unit_on(date(2024, 3, 1)), Some(dec!(55)));
        assert_eq!(timeline.price_per_unit_on(date(2024, 4, 1)), Some(dec!(52)));

        let active: Vec<_> = timeline.intervals().iter().filter(|i| i.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].price_per_unit, dec!(52));
    }

    #[test]
    fn test_previous_interval_closed_on_change_date() {
        let product = ProductId::new_v7();
        let mut timeline = PriceTimeline::new(product);
        let change = timeline.record_price(dec!(50), date(2024, 1, 1), None).unwrap();
        timeline.apply(change);

        let change = timeline.record_price(dec!(55), date(2024, 2, 10), None).unwrap();
        let closed = match &change {
            PriceChange::Changed { closed, .. } => closed.clone().unwrap(),
            PriceChange::Unchanged => panic!("expected a change"),
        };
        timeline.apply(change);

        assert_eq!(closed.span.to, Some(date(2024, 2, 10)));
        // The closed interval is never selected on or after the change date.
        assert_eq!(timeline.price_per_unit_on(date(2024, 2, 10)), Some(dec!(55)));
        assert_eq!(timeline.price_per_unit_on(date(2024, 2, 11)), Some(dec!(55)));
    }

    #[test]
    fn test_repeated_same_price_never_fragments_history() {
        let product = ProductId::new_v7();
        let mut timeline = PriceTimeline::new(product);
        let change = timeline.record_price(dec!(185), date(2024, 1, 1), None).unwrap();
        timeline.apply(change);

        for day in 2..10 {
            let change = timeline
                .record_price(dec!(185), date(2024, 1, day), None)
                .unwrap();
            assert!(matches!(change, PriceChange::Unchanged));
            timeline.apply(change);
        }

        assert_eq!(timeline.intervals().len(), 1);
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let timeline = PriceTimeline::new(ProductId::new_v7());

        assert!(matches!(
            timeline.record_price(dec!(0), date(2024, 1, 1), None),
            Err(PricingError::InvalidPrice(_))
        ));
        assert!(matches!(
            timeline.record_price(dec!(-1.50), date(2024, 1, 1), None),
            Err(PricingError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_change_before_current_start_rejected() {
        let product = ProductId::new_v7();
        let mut timeline = PriceTimeline::new(product);
        let change = timeline.record_price(dec!(50), date(2024, 6, 1), None).unwrap();
        timeline.apply(change);

        // Cannot close the current interval before it opened.
        let result = timeline.record_price(dec!(60), date(2024, 5, 1), None);
        assert!(matches!(result, Err(PricingError::Temporal(_))));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_at_most_one_active_interval(
        prices in prop::collection::vec(1i64..10_000, 1..12),
        gaps in prop::collection::vec(0i64..45, 1..12),
    ) {
        let product = ProductId::new_v7();
        let mut timeline = PriceTimeline::new(product);
        let mut day = date(2024, 1, 1);

        for (cents, gap) in prices.iter().zip(gaps.iter()) {
            day += Duration::days(*gap);
            let price = Decimal::new(*cents, 2);
            let change = timeline.record_price(price, day, None).unwrap();
            timeline.apply(change);

            let active = timeline.intervals().iter().filter(|i| i.active).count();
            prop_assert!(active <= 1);
        }
    }

    #[test]
    fn prop_resolution_matches_last_recorded_price(
        prices in prop::collection::vec(1i64..10_000, 1..12),
        gaps in prop::collection::vec(1i64..45, 1..12),
    ) {
        let product = ProductId::new_v7();
        let mut timeline = PriceTimeline::new(product);
        let mut day = date(2024, 1, 1);
        let mut last_price = None;

        for (cents, gap) in prices.iter().zip(gaps.iter()) {
            day += Duration::days(*gap);
            let price = Decimal::new(*cents, 2);
            let change = timeline.record_price(price, day, None).unwrap();
            timeline.apply(change);
            last_price = Some(price);
        }

        // Any date from the last change onwards resolves to the last price.
        prop_assert_eq!(timeline.price_per_unit_on(day), last_price);
        prop_assert_eq!(
            timeline.price_per_unit_on(day + Duration::days(365)),
            last_price
        );
    }
}
