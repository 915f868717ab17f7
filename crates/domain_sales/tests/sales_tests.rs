//! Comprehensive tests for domain_sales

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use core_kernel::{CustomerId, ProductId};

use domain_sales::delivery::{resolve_unit_price, DeliveryEvent};
use domain_sales::error::SalesError;
use domain_sales::order::{
    decode_payment_metadata, encode_payment_metadata, Order, OrderItem, OrderStatus,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Delivery Tests
// ============================================================================

mod delivery_tests {
    use super::*;

    #[test]
    fn test_total_keeps_decimal_scale() {
        let delivery = DeliveryEvent::new(
            CustomerId::new_v7(),
            ProductId::new_v7(),
            date(2024, 1, 1),
            dec!(1.5),
            dec!(48.50),
            None,
            None,
        )
        .unwrap();

        // Plain decimal multiplication, no extra rounding.
        assert_eq!(delivery.total_amount, dec!(72.750));
    }

    #[test]
    fn test_same_triple_collides() {
        let customer = CustomerId::new_v7();
        let product = ProductId::new_v7();
        let day = date(2024, 1, 1);

        let first = DeliveryEvent::new(customer, product, day, dec!(2), dec!(50), None, None)
            .unwrap();
        let second = DeliveryEvent::new(customer, product, day, dec!(3), dec!(50), None, None)
            .unwrap();

        // Same key means storage rejects the second row as a conflict.
        assert_eq!(first.dedup_key(), second.dedup_key());
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_different_day_does_not_collide() {
        let customer = CustomerId::new_v7();
        let product = ProductId::new_v7();

        let first = DeliveryEvent::new(
            customer,
            product,
            date(2024, 1, 1),
            dec!(2),
            dec!(50),
            None,
            None,
        )
        .unwrap();
        let second = DeliveryEvent::new(
            customer,
            product,
            date(2024, 1, 2),
            dec!(2),
            dec!(50),
            None,
            None,
        )
        .unwrap();

        assert_ne!(first.dedup_key(), second.dedup_key());
    }

    #[test]
    fn test_unpriced_product_cannot_be_delivered() {
        // No explicit price, no active interval: the delivery must fail
        // before anything is persisted.
        let result = resolve_unit_price(ProductId::new_v7(), None, None);
        assert!(matches!(result, Err(SalesError::NoActivePrice(_))));
    }
}

// ============================================================================
// Order Tests
// ============================================================================

mod order_tests {
    use super::*;

    #[test]
    fn test_new_order_is_pending() {
        let order = Order::new(
            Some(CustomerId::new_v7()),
            vec![OrderItem::new(ProductId::new_v7(), dec!(2), dec!(90)).unwrap()],
            None,
            None,
        )
        .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount, dec!(180));
    }

    #[test]
    fn test_metadata_survives_storage_encoding() {
        let metadata = json!({"gateway": "card", "last4": "4242", "amount": 180});
        let stored = encode_payment_metadata(Some(&metadata)).unwrap();
        let loaded = decode_payment_metadata(stored.as_deref());

        assert_eq!(loaded, Some(metadata));
    }

    #[test]
    fn test_unreadable_metadata_drops_silently() {
        // A corrupt column value must not fail the order lookup.
        assert_eq!(decode_payment_metadata(Some("{\"gateway\": ")), None);
        assert_eq!(decode_payment_metadata(Some("")), None);
    }
}

// ============================================================================
// Fulfillment Tests
// ============================================================================

mod fulfillment_tests {
    use super::*;
    use domain_inventory::StockLedger;

    #[test]
    fn test_fulfillment_debits_stock_per_item() {
        let milk = ProductId::new_v7();
        let curd = ProductId::new_v7();
        let mut ledger = StockLedger::new();
        ledger.apply_delta(milk, dec!(50));
        ledger.apply_delta(curd, dec!(10));

        let order = Order::new(
            None,
            vec![
                OrderItem::new(milk, dec!(5), dec!(90)).unwrap(),
                OrderItem::new(curd, dec!(2), dec!(120)).unwrap(),
            ],
            None,
            None,
        )
        .unwrap();

        for (product, delta) in order.fulfillment_debits() {
            ledger.apply_delta(product, delta);
        }

        assert_eq!(ledger.current_balance(milk), dec!(45));
        assert_eq!(ledger.current_balance(curd), dec!(8));
    }

    #[test]
    fn test_oversized_order_empties_stock() {
        let milk = ProductId::new_v7();
        let mut ledger = StockLedger::new();
        ledger.apply_delta(milk, dec!(3));

        let order = Order::new(
            None,
            vec![OrderItem::new(milk, dec!(10), dec!(90)).unwrap()],
            None,
            None,
        )
        .unwrap();

        for (product, delta) in order.fulfillment_debits() {
            ledger.apply_delta(product, delta);
        }

        // The sale goes through and the shelf is simply empty.
        assert_eq!(ledger.current_balance(milk), Decimal::ZERO);
    }

    #[test]
    fn test_repeated_product_lines_debit_sequentially() {
        let milk = ProductId::new_v7();
        let mut ledger = StockLedger::new();
        ledger.apply_delta(milk, dec!(4));

        let order = Order::new(
            None,
            vec![
                OrderItem::new(milk, dec!(3), dec!(90)).unwrap(),
                OrderItem::new(milk, dec!(3), dec!(90)).unwrap(),
            ],
            None,
            None,
        )
        .unwrap();

        for (product, delta) in order.fulfillment_debits() {
            ledger.apply_delta(product, delta);
        }

        assert_eq!(ledger.current_balance(milk), Decimal::ZERO);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

proptest! {
    #[test]
    fn prop_order_total_is_sum_of_subtotals(
        lines in prop::collection::vec((quantity_strategy(), quantity_strategy()), 1..8),
    ) {
        let items: Vec<OrderItem> = lines
            .iter()
            .map(|(qty, price)| OrderItem::new(ProductId::new_v7(), *qty, *price).unwrap())
            .collect();
        let expected: Decimal = items.iter().map(|i| i.subtotal).sum();

        let order = Order::new(None, items, None, None).unwrap();
        prop_assert_eq!(order.total_amount, expected);
    }

    #[test]
    fn prop_line_total_is_product(qty in quantity_strategy(), price in quantity_strategy()) {
        let delivery = DeliveryEvent::new(
            CustomerId::new_v7(),
            ProductId::new_v7(),
            date(2024, 1, 1),
            qty,
            price,
            None,
            None,
        )
        .unwrap();

        prop_assert_eq!(delivery.total_amount, qty * price);
    }
}
