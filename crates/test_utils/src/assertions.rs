//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use chrono::NaiveDate;
use core_kernel::EffectiveSpan;
use domain_billing::{settlement_status, Invoice};
use domain_inventory::StockBalance;
use rust_decimal::Decimal;

/// Asserts that an effective span contains a specific date
pub fn assert_span_contains(span: &EffectiveSpan, date: NaiveDate) {
    assert!(
        span.contains(date),
        "Span {:?} does not contain date {}",
        span,
        date
    );
}

/// Asserts that an effective span does not contain a specific date
pub fn assert_span_excludes(span: &EffectiveSpan, date: NaiveDate) {
    assert!(
        !span.contains(date),
        "Span {:?} unexpectedly contains date {}",
        span,
        date
    );
}

/// Asserts that two effective spans overlap
pub fn assert_spans_overlap(span1: &EffectiveSpan, span2: &EffectiveSpan) {
    assert!(
        span1.overlaps(span2),
        "Spans {:?} and {:?} do not overlap",
        span1,
        span2
    );
}

/// Asserts that two effective spans do not overlap
pub fn assert_spans_disjoint(span1: &EffectiveSpan, span2: &EffectiveSpan) {
    assert!(
        !span1.overlaps(span2),
        "Spans {:?} and {:?} unexpectedly overlap",
        span1,
        span2
    );
}

/// Asserts the invoice amount identity: `due == max(0, total − paid)`
///
/// Holds after every reconciliation and status override, including a
/// forced `Paid` (which settles the amounts first).
pub fn assert_invoice_amounts_consistent(invoice: &Invoice) {
    let expected_due = (invoice.total_amount - invoice.paid_amount).max(Decimal::ZERO);
    assert_eq!(
        invoice.due_amount, expected_due,
        "Invoice {} due amount {} does not equal max(0, {} - {})",
        invoice.invoice_number, invoice.due_amount, invoice.total_amount, invoice.paid_amount
    );
}

/// Asserts that the invoice status matches its amounts
///
/// Only valid for invoices that have not been through an administrative
/// status override; a forced `Partial`/`Pending` tag diverges from the
/// derivation on purpose.
pub fn assert_invoice_status_derived(invoice: &Invoice) {
    let expected = settlement_status(invoice.paid_amount, invoice.total_amount);
    assert_eq!(
        invoice.status, expected,
        "Invoice {} status {:?} does not match amounts (paid={}, total={})",
        invoice.invoice_number, invoice.status, invoice.paid_amount, invoice.total_amount
    );
}

/// Asserts that a stock balance has not gone negative
pub fn assert_balance_non_negative(balance: &StockBalance) {
    assert!(
        balance.quantity >= Decimal::ZERO,
        "Stock balance for product {} is negative: {}",
        balance.product_id,
        balance.quantity
    );
}

/// Asserts that a decimal value is within a range
pub fn assert_decimal_in_range(value: Decimal, min: Decimal, max: Decimal) {
    assert!(
        value >= min && value <= max,
        "Decimal {} is not in range [{}, {}]",
        value,
        min,
        max
    );
}

/// Asserts that a decimal value is approximately equal to another
pub fn assert_decimal_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Decimals differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that a result is Ok and returns the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Asserts that a result is Err and returns the error
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => e,
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => panic!("{}: got Ok({:?})", $msg, value),
            Err(e) => e,
        }
    };
}

/// Asserts that an error matches a specific variant
#[macro_export]
macro_rules! assert_err_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Ok(value) => panic!("Expected Err matching {}, got Ok({:?})", stringify!($pattern), value),
            Err(ref e) => {
                assert!(
                    matches!(e, $pattern),
                    "Error {:?} does not match pattern {}",
                    e,
                    stringify!($pattern)
                );
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{BillingPeriod, CustomerId, DeliveryId};
    use domain_billing::BilledDelivery;
    use rust_decimal_macros::dec;

    fn sample_invoice() -> Invoice {
        Invoice::issue(
            CustomerId::new_v7(),
            None,
            BillingPeriod::month(2024, 1).unwrap(),
            vec![BilledDelivery {
                delivery_id: DeliveryId::new_v7(),
                quantity: dec!(20),
                amount: dec!(1000),
            }],
        )
        .unwrap()
    }

    #[test]
    fn test_span_assertions() {
        let span = EffectiveSpan::bounded(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();

        assert_span_contains(&span, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_span_excludes(&span, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[test]
    fn test_invoice_amounts_consistent_through_payment() {
        let mut invoice = sample_invoice();
        assert_invoice_amounts_consistent(&invoice);

        invoice.apply_payment(dec!(400));
        assert_invoice_amounts_consistent(&invoice);
        assert_invoice_status_derived(&invoice);

        invoice.apply_payment(dec!(700));
        assert_invoice_amounts_consistent(&invoice);
        assert_invoice_status_derived(&invoice);
    }

    #[test]
    #[should_panic(expected = "does not equal max")]
    fn test_invoice_amounts_inconsistent_panics() {
        let mut invoice = sample_invoice();
        invoice.due_amount = dec!(123.45);
        assert_invoice_amounts_consistent(&invoice);
    }

    #[test]
    fn test_assert_decimal_approx_eq() {
        let a = dec!(100.001);
        let b = dec!(100.002);
        assert_decimal_approx_eq(a, b, dec!(0.01));
    }
}
