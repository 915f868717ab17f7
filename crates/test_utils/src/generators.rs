//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{Duration, NaiveDate};
use core_kernel::{BillingPeriod, CustomerId, EffectiveSpan, ProductId, StaffId};
use domain_billing::PaymentMethod;
use domain_customer::MilkType;
use domain_inventory::ProductCategory;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating valid product categories
pub fn product_category_strategy() -> impl Strategy<Value = ProductCategory> {
    prop_oneof![
        Just(ProductCategory::CowMilk),
        Just(ProductCategory::BuffaloMilk),
        Just(ProductCategory::Curd),
        Just(ProductCategory::Ghee),
        Just(ProductCategory::Other),
    ]
}

/// Strategy for generating milk type preferences
pub fn milk_type_strategy() -> impl Strategy<Value = MilkType> {
    prop_oneof![
        Just(MilkType::Cow),
        Just(MilkType::Buffalo),
        Just(MilkType::Both),
    ]
}

/// Strategy for generating payment methods
pub fn payment_method_strategy() -> impl Strategy<Value = PaymentMethod> {
    prop_oneof![
        Just(PaymentMethod::Cash),
        Just(PaymentMethod::Online),
        Just(PaymentMethod::Cheque),
        Just(PaymentMethod::Other),
    ]
}

/// Strategy for generating strictly positive quantities (up to 2 decimal places)
pub fn positive_quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for generating strictly positive unit prices (up to 2 decimal places)
pub fn price_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for generating signed stock deltas
///
/// Covers both receipts (positive) and deductions (negative), the raw
/// material for the clamped-balance property.
pub fn stock_delta_strategy() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for generating sequences of signed stock deltas
pub fn stock_delta_sequence_strategy() -> impl Strategy<Value = Vec<Decimal>> {
    proptest::collection::vec(stock_delta_strategy(), 0..50)
}

/// Strategy for generating dates within 2024
pub fn date_2024_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..365i64).prop_map(|days| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(days)
    })
}

/// Strategy for generating valid date ranges (start not after end)
pub fn date_range_strategy() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (0i64..365i64, 0i64..365i64).prop_map(|(start_days, duration_days)| {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(start_days);
        let end = start + Duration::days(duration_days);
        (start, end)
    })
}

/// Strategy for generating bounded effective spans
pub fn effective_span_strategy() -> impl Strategy<Value = EffectiveSpan> {
    date_range_strategy().prop_map(|(from, to)| {
        EffectiveSpan::bounded(from, to).expect("Generated invalid span")
    })
}

/// Strategy for generating valid billing periods
pub fn billing_period_strategy() -> impl Strategy<Value = BillingPeriod> {
    date_range_strategy().prop_map(|(start, end)| {
        BillingPeriod::new(start, end).expect("Generated invalid period")
    })
}

/// Strategy for generating ProductId
pub fn product_id_strategy() -> impl Strategy<Value = ProductId> {
    any::<[u8; 16]>().prop_map(|bytes| {
        ProductId::from_uuid(uuid::Uuid::from_bytes(bytes))
    })
}

/// Strategy for generating CustomerId
pub fn customer_id_strategy() -> impl Strategy<Value = CustomerId> {
    any::<[u8; 16]>().prop_map(|bytes| {
        CustomerId::from_uuid(uuid::Uuid::from_bytes(bytes))
    })
}

/// Strategy for generating StaffId
pub fn staff_id_strategy() -> impl Strategy<Value = StaffId> {
    any::<[u8; 16]>().prop_map(|bytes| {
        StaffId::from_uuid(uuid::Uuid::from_bytes(bytes))
    })
}

/// Strategy for generating valid phone numbers
pub fn phone_strategy() -> impl Strategy<Value = String> {
    (70000u32..99999u32, 10000u32..99999u32)
        .prop_map(|(prefix, line)| format!("+91-{}-{}", prefix, line))
}

/// Strategy for generating valid email addresses
pub fn email_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{5,10}", "[a-z]{3,8}")
        .prop_map(|(local, domain)| format!("{}@{}.com", local, domain))
}

/// Strategy for generating names
pub fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,10}".prop_map(|s| s)
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn quantity_is_always_positive(quantity in positive_quantity_strategy()) {
            prop_assert!(quantity > Decimal::ZERO);
        }

        #[test]
        fn price_is_always_positive(price in price_strategy()) {
            prop_assert!(price > Decimal::ZERO);
        }

        #[test]
        fn span_end_not_before_start(span in effective_span_strategy()) {
            if let Some(to) = span.to {
                prop_assert!(to >= span.from);
            }
        }

        #[test]
        fn billing_period_is_ordered(period in billing_period_strategy()) {
            prop_assert!(period.start <= period.end);
            prop_assert!(period.days() >= 1);
        }

        #[test]
        fn generated_dates_stay_inside_2024(date in date_2024_strategy()) {
            prop_assert!(date >= NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
            prop_assert!(date <= NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        }

        #[test]
        fn phone_numbers_have_country_code(phone in phone_strategy()) {
            prop_assert!(phone.starts_with("+91-"));
        }
    }
}
