//! Invoice management
//!
//! An invoice bills one customer for the deliveries made over a period.
//! The paid and due amounts move only through reconciliation; `due`
//! always equals `total − paid` floored at zero.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{BillingPeriod, CustomerId, DeliveryId, InvoiceId};

use crate::error::BillingError;

/// Invoice settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    /// Nothing received yet
    Pending,
    /// Some amount received, balance outstanding
    Partial,
    /// Fully settled
    Paid,
}

/// Derives the settlement status from the amounts
///
/// The single source of truth for status: `paid ≥ total` is paid in
/// full, any other positive amount is partial, zero is pending. The
/// administrative override in [`Invoice::force_status`] is the one
/// caller allowed to diverge from this derivation.
pub fn settlement_status(paid: Decimal, total: Decimal) -> InvoiceStatus {
    if paid >= total {
        InvoiceStatus::Paid
    } else if paid > Decimal::ZERO {
        InvoiceStatus::Partial
    } else {
        InvoiceStatus::Pending
    }
}

/// Applies a received amount to an invoice's running amounts
///
/// Returns `(paid, due, status)` after the application. The due amount
/// floors at zero on overpayment. Works on bare amounts so storage
/// updates can apply the rule without materializing the full invoice.
pub fn apply_amounts(
    total: Decimal,
    paid_so_far: Decimal,
    amount: Decimal,
) -> (Decimal, Decimal, InvoiceStatus) {
    let paid = paid_so_far + amount;
    let due = (total - paid).max(Decimal::ZERO);
    (paid, due, settlement_status(paid, total))
}

/// A delivery line billed on an invoice
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BilledDelivery {
    /// The delivery being billed
    pub delivery_id: DeliveryId,
    /// Quantity delivered
    pub quantity: Decimal,
    /// Line amount
    pub amount: Decimal,
}

/// An invoice covering a customer's deliveries for a period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Invoice number (human-readable, unique)
    pub invoice_number: String,
    /// Billed customer
    pub customer_id: CustomerId,
    /// Issue date
    pub invoice_date: NaiveDate,
    /// Billed period
    pub period: BillingPeriod,
    /// Sum of billed quantities
    pub total_quantity: Decimal,
    /// Sum of billed amounts
    pub total_amount: Decimal,
    /// Amount received so far
    pub paid_amount: Decimal,
    /// Outstanding amount, `max(0, total − paid)`
    pub due_amount: Decimal,
    /// Settlement status
    pub status: InvoiceStatus,
    /// Deliveries the invoice covers
    pub lines: Vec<BilledDelivery>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Issues an invoice over a set of delivered lines
    ///
    /// Totals are summed from the lines; the invoice starts unpaid.
    /// When `invoice_number` is `None` a number is generated.
    pub fn issue(
        customer_id: CustomerId,
        invoice_number: Option<String>,
        period: BillingPeriod,
        lines: Vec<BilledDelivery>,
    ) -> Result<Self, BillingError> {
        if lines.is_empty() {
            return Err(BillingError::InvalidInvoice(
                "invoice must bill at least one delivery".to_string(),
            ));
        }
        let total_quantity = lines.iter().map(|l| l.quantity).sum();
        let total_amount: Decimal = lines.iter().map(|l| l.amount).sum();
        let now = Utc::now();

        Ok(Self {
            id: InvoiceId::new_v7(),
            invoice_number: invoice_number.unwrap_or_else(generate_invoice_number),
            customer_id,
            invoice_date: now.date_naive(),
            period,
            total_quantity,
            total_amount,
            paid_amount: Decimal::ZERO,
            due_amount: total_amount,
            status: InvoiceStatus::Pending,
            lines,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a received amount and rederives the status
    ///
    /// Overpayment settles the invoice; the due amount floors at zero
    /// rather than going negative.
    pub fn apply_payment(&mut self, amount: Decimal) -> InvoiceStatus {
        let (paid, due, status) = apply_amounts(self.total_amount, self.paid_amount, amount);
        self.paid_amount = paid;
        self.due_amount = due;
        self.status = status;
        self.updated_at = Utc::now();
        self.status
    }

    /// Administrative status override from the billing desk
    ///
    /// Forcing `Paid` settles the amounts (`paid = total`, `due = 0`).
    /// Forcing `Partial` or `Pending` changes the tag only and leaves
    /// the amounts untouched.
    pub fn force_status(&mut self, status: InvoiceStatus) {
        if status == InvoiceStatus::Paid {
            self.paid_amount = self.total_amount;
            self.due_amount = Decimal::ZERO;
        }
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Outstanding balance
    pub fn balance_due(&self) -> Decimal {
        self.due_amount
    }

    /// True once the invoice needs no further payments
    pub fn is_settled(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }
}

/// Generates a unique invoice number
pub fn generate_invoice_number() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("INV-{}", duration.as_millis() % 10_000_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn period() -> BillingPeriod {
        BillingPeriod::month(2024, 1).unwrap()
    }

    fn line(quantity: Decimal, amount: Decimal) -> BilledDelivery {
        BilledDelivery {
            delivery_id: DeliveryId::new_v7(),
            quantity,
            amount,
        }
    }

    #[test]
    fn test_issue_sums_lines() {
        let invoice = Invoice::issue(
            CustomerId::new_v7(),
            Some("INV-2024-0001".to_string()),
            period(),
            vec![line(dec!(2), dec!(370)), line(dec!(1.5), dec!(277.50))],
        )
        .unwrap();

        assert_eq!(invoice.total_quantity, dec!(3.5));
        assert_eq!(invoice.total_amount, dec!(647.50));
        assert_eq!(invoice.due_amount, dec!(647.50));
        assert_eq!(invoice.status, InvoiceStatus::Pending);
    }

    #[test]
    fn test_empty_invoice_rejected() {
        let result = Invoice::issue(CustomerId::new_v7(), None, period(), vec![]);
        assert!(matches!(result, Err(BillingError::InvalidInvoice(_))));
    }

    #[test]
    fn test_generated_number_when_absent() {
        let invoice =
            Invoice::issue(CustomerId::new_v7(), None, period(), vec![line(dec!(1), dec!(100))])
                .unwrap();
        assert!(invoice.invoice_number.starts_with("INV-"));
    }

    #[test]
    fn test_settlement_derivation() {
        assert_eq!(settlement_status(dec!(0), dec!(1000)), InvoiceStatus::Pending);
        assert_eq!(settlement_status(dec!(400), dec!(1000)), InvoiceStatus::Partial);
        assert_eq!(settlement_status(dec!(1000), dec!(1000)), InvoiceStatus::Paid);
        assert_eq!(settlement_status(dec!(1200), dec!(1000)), InvoiceStatus::Paid);
    }

    #[test]
    fn test_overpayment_floors_due_at_zero() {
        let mut invoice =
            Invoice::issue(CustomerId::new_v7(), None, period(), vec![line(dec!(1), dec!(500))])
                .unwrap();

        invoice.apply_payment(dec!(700));
        assert_eq!(invoice.paid_amount, dec!(700));
        assert_eq!(invoice.due_amount, Decimal::ZERO);
        assert_eq!(invoice.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_force_paid_settles_amounts() {
        let mut invoice =
            Invoice::issue(CustomerId::new_v7(), None, period(), vec![line(dec!(1), dec!(500))])
                .unwrap();
        invoice.apply_payment(dec!(100));

        invoice.force_status(InvoiceStatus::Paid);
        assert_eq!(invoice.paid_amount, dec!(500));
        assert_eq!(invoice.due_amount, Decimal::ZERO);
    }

    #[test]
    fn test_force_partial_keeps_amounts() {
        let mut invoice =
            Invoice::issue(CustomerId::new_v7(), None, period(), vec![line(dec!(1), dec!(500))])
                .unwrap();

        invoice.force_status(InvoiceStatus::Partial);
        assert_eq!(invoice.status, InvoiceStatus::Partial);
        assert_eq!(invoice.paid_amount, Decimal::ZERO);
        assert_eq!(invoice.due_amount, dec!(500));
    }
}
