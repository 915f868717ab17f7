//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the dairy system.
//! These fixtures are designed to be consistent and predictable for unit tests.
//! The `unique_*` helpers exist for integration tests: phone, email, and
//! product name carry unique constraints, so shared-database tests need
//! values that never collide.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::NaiveDate;
use core_kernel::{BillingPeriod, CustomerId, DeliveryId, InvoiceId, ProductId, StaffId};
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

static UNIQUE_COUNTER: AtomicU32 = AtomicU32::new(1);

fn next_unique() -> u32 {
    UNIQUE_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Start of the standard test month (Jan 1, 2024)
    pub fn january_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    /// Mid-month date for containment tests
    pub fn mid_january() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    /// End of the standard test month (Jan 31, 2024)
    pub fn january_end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    /// First day after the standard test month
    pub fn february_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    /// Date before the standard test month
    pub fn december_past() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 12, 1).unwrap()
    }

    /// The standard billing period (January 2024)
    pub fn january_period() -> BillingPeriod {
        BillingPeriod::month(2024, 1).unwrap()
    }

    /// Standard delivery date inside the test month
    pub fn delivery_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic product ID for testing
    pub fn product_id() -> ProductId {
        ProductId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap())
    }

    /// Creates a deterministic customer ID for testing
    pub fn customer_id() -> CustomerId {
        CustomerId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap())
    }

    /// Creates a deterministic staff ID for testing
    pub fn staff_id() -> StaffId {
        StaffId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap())
    }

    /// Creates a deterministic delivery ID for testing
    pub fn delivery_id() -> DeliveryId {
        DeliveryId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440004").unwrap())
    }

    /// Creates a deterministic invoice ID for testing
    pub fn invoice_id() -> InvoiceId {
        InvoiceId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440005").unwrap())
    }
}

/// Fixture for decimal test data
pub struct DecimalFixtures;

impl DecimalFixtures {
    /// Standard milk price per litre
    pub fn milk_price() -> Decimal {
        dec!(50)
    }

    /// Revised milk price for supersession tests
    pub fn revised_price() -> Decimal {
        dec!(55)
    }

    /// Standard morning delivery quantity
    pub fn morning_quantity() -> Decimal {
        dec!(2)
    }

    /// Standard stock receipt quantity
    pub fn receipt_quantity() -> Decimal {
        dec!(120)
    }

    /// Zero for comparison tests
    pub fn zero() -> Decimal {
        Decimal::ZERO
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    /// Standard product name
    pub fn product_name() -> &'static str {
        "Fresh Cow Milk"
    }

    /// Standard measurement unit
    pub fn unit() -> &'static str {
        "litre"
    }

    /// Standard invoice number
    pub fn invoice_number() -> &'static str {
        "INV-2024-0107"
    }

    /// Test customer name
    pub fn customer_name() -> &'static str {
        "Ramesh Kumar"
    }

    /// Test phone number
    pub fn phone() -> &'static str {
        "+91-98765-43210"
    }

    /// Test email address
    pub fn email() -> &'static str {
        "ramesh.kumar@example.com"
    }

    /// Test delivery address
    pub fn address() -> &'static str {
        "14 Temple Street, Mysuru"
    }
}

/// Generates a phone number that no earlier call has produced
pub fn unique_phone() -> String {
    format!("+91-90000-{:05}", next_unique())
}

/// Generates an email address that no earlier call has produced
pub fn unique_email() -> String {
    format!("customer{}@example.com", next_unique())
}

/// Generates a product name that no earlier call has produced
pub fn unique_product_name() -> String {
    format!("Test Milk {}", next_unique())
}

/// Generates a plausible customer name
pub fn random_customer_name() -> String {
    Name().fake()
}
