//! Payment reconciliation
//!
//! Reconciliation decides which invoice a payment lands on and applies
//! the amount to it. The selection rule: an explicitly named invoice
//! wins; otherwise the customer's oldest unsettled invoice takes the
//! money; with neither, the payment stands alone and touches nothing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{InvoiceId, PaymentId};

use crate::invoice::{Invoice, InvoiceStatus};
use crate::payment::Payment;

/// The result of reconciling one payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutcome {
    /// The recorded payment
    pub payment_id: PaymentId,
    /// Invoice the amount was applied to, if any
    pub invoice_id: Option<InvoiceId>,
    /// Settlement status after application
    ///
    /// Standalone payments report `Pending`: no invoice moved.
    pub status: InvoiceStatus,
}

/// Picks the invoice an unaddressed payment should settle
///
/// The customer's unsettled invoices are considered oldest-first:
/// earliest invoice date wins, ties broken by creation time so the
/// choice is stable.
pub fn select_open_invoice(invoices: &[Invoice]) -> Option<&Invoice> {
    invoices
        .iter()
        .filter(|i| !i.is_settled())
        .min_by_key(|i| (i.invoice_date, i.created_at, *i.id.as_uuid()))
}

/// Applies a payment to its selected invoice, if one was found
///
/// The caller resolves the invoice (explicit id or
/// [`select_open_invoice`]) and persists both records afterwards.
pub fn reconcile(payment: &Payment, invoice: Option<&mut Invoice>) -> PaymentOutcome {
    match invoice {
        Some(invoice) => {
            let status = invoice.apply_payment(payment.amount);
            debug!(
                payment_id = %payment.id,
                invoice_id = %invoice.id,
                amount = %payment.amount,
                status = ?status,
                "payment reconciled"
            );
            PaymentOutcome {
                payment_id: payment.id,
                invoice_id: Some(invoice.id),
                status,
            }
        }
        None => PaymentOutcome {
            payment_id: payment.id,
            invoice_id: None,
            status: InvoiceStatus::Pending,
        },
    }
}
