//! Payment records
//!
//! A payment is money received from a customer, optionally tied to one
//! invoice. The invoice association is fixed when the payment is
//! recorded; reconciliation never reassigns a payment afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, InvoiceId, PaymentId, StaffId};

use crate::error::BillingError;

/// How the customer paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash on the round or at the counter
    Cash,
    /// Bank or UPI transfer
    Online,
    /// Cheque
    Cheque,
    /// Anything else
    Other,
}

/// A received payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Paying customer
    pub customer_id: CustomerId,
    /// Invoice the payment is tied to; fixed at creation
    pub invoice_id: Option<InvoiceId>,
    /// Amount received, strictly positive
    pub amount: Decimal,
    /// Day the money arrived
    pub payment_date: NaiveDate,
    /// Payment method
    pub method: PaymentMethod,
    /// External reference (cheque number, transaction id)
    pub reference_number: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Staff member who received the payment
    pub received_by: Option<StaffId>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Records a payment, validating the amount
    pub fn new(
        customer_id: CustomerId,
        amount: Decimal,
        payment_date: NaiveDate,
        method: PaymentMethod,
        invoice_id: Option<InvoiceId>,
        received_by: Option<StaffId>,
    ) -> Result<Self, BillingError> {
        if amount <= Decimal::ZERO {
            return Err(BillingError::InvalidAmount(format!(
                "payment amount must be positive, got {amount}"
            )));
        }
        Ok(Self {
            id: PaymentId::new_v7(),
            customer_id,
            invoice_id,
            amount,
            payment_date,
            method,
            reference_number: None,
            notes: None,
            received_by,
            created_at: Utc::now(),
        })
    }

    /// Sets the external reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference_number = Some(reference.into());
        self
    }

    /// Sets the notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
