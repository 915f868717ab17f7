//! Billing repository implementation
//!
//! This module provides database access for invoices and payments.
//! Payment application locks the target invoice row, applies the amount
//! through the domain rules, and writes payment and invoice together in
//! one transaction, so the due amount can never drift from
//! `max(0, total − paid)`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use core_kernel::{BillingPeriod, CustomerId, DeliveryId, InvoiceId, PaymentId, StaffId};
use domain_billing::{
    apply_amounts, BilledDelivery, Invoice, InvoiceStatus as DomainInvoiceStatus, Payment,
    PaymentMethod as DomainPaymentMethod, PaymentOutcome,
};

use crate::error::DatabaseError;
use crate::repositories::sales::ensure_customer_exists;

/// Repository for managing invoices and payments
#[derive(Debug, Clone)]
pub struct BillingRepository {
    pool: PgPool,
}

impl BillingRepository {
    /// Creates a new BillingRepository with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Issues an invoice over a set of recorded deliveries
    ///
    /// Every referenced delivery must exist and belong to the billed
    /// customer. Totals are summed from the delivery lines; the invoice
    /// starts unpaid. A duplicate invoice number surfaces as a conflict.
    ///
    /// # Arguments
    ///
    /// * `new` - The invoice data
    ///
    /// # Returns
    ///
    /// The issued invoice with its billed lines
    pub async fn create_invoice(&self, new: NewInvoice) -> Result<Invoice, DatabaseError> {
        let period = BillingPeriod::new(new.period_start, new.period_end)?;

        let mut tx = self.pool.begin().await?;
        ensure_customer_exists(&mut tx, new.customer_id).await?;

        let lines = load_billed_deliveries(&mut tx, new.customer_id, &new.delivery_ids).await?;
        let invoice = Invoice::issue(new.customer_id, new.invoice_number, period, lines)?;

        sqlx::query(
            r#"
            INSERT INTO invoices (
                invoice_id, invoice_number, customer_id, invoice_date,
                period_start, period_end, total_quantity, total_amount,
                paid_amount, due_amount, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(*invoice.id.as_uuid())
        .bind(&invoice.invoice_number)
        .bind(*invoice.customer_id.as_uuid())
        .bind(invoice.invoice_date)
        .bind(invoice.period.start)
        .bind(invoice.period.end)
        .bind(invoice.total_quantity)
        .bind(invoice.total_amount)
        .bind(invoice.paid_amount)
        .bind(invoice.due_amount)
        .bind(InvoiceStatus::from(invoice.status))
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&mut *tx)
        .await?;

        for line in &invoice.lines {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (item_id, invoice_id, delivery_id, quantity, amount)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(*invoice.id.as_uuid())
            .bind(*line.delivery_id.as_uuid())
            .bind(line.quantity)
            .bind(line.amount)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(invoice)
    }

    /// Records a payment and applies it to an invoice
    ///
    /// An explicitly named invoice receives the amount; otherwise the
    /// customer's oldest unsettled invoice does. With no open invoice
    /// the payment is stored standalone and the outcome reports
    /// `Pending`. The chosen invoice id is fixed on the payment row.
    ///
    /// # Arguments
    ///
    /// * `new` - The payment data
    ///
    /// # Returns
    ///
    /// The reconciliation outcome
    pub async fn record_payment(&self, new: NewPayment) -> Result<PaymentOutcome, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        ensure_customer_exists(&mut tx, new.customer_id).await?;

        let target = match new.invoice_id {
            Some(invoice_id) => {
                let row = lock_invoice(&mut tx, invoice_id)
                    .await?
                    .ok_or_else(|| DatabaseError::not_found("Invoice", invoice_id))?;
                if row.customer_id != *new.customer_id.as_uuid() {
                    return Err(DatabaseError::Validation(format!(
                        "invoice '{}' does not belong to customer '{}'",
                        invoice_id, new.customer_id
                    )));
                }
                Some(row)
            }
            None => lock_oldest_open_invoice(&mut tx, new.customer_id).await?,
        };

        let payment_date = new.payment_date.unwrap_or_else(|| Utc::now().date_naive());
        let method = new.method.unwrap_or(DomainPaymentMethod::Cash);
        let mut payment = Payment::new(
            new.customer_id,
            new.amount,
            payment_date,
            method,
            target.as_ref().map(|row| row.invoice_id.into()),
            new.received_by,
        )?;
        if let Some(reference) = new.reference_number {
            payment = payment.with_reference(reference);
        }
        if let Some(notes) = new.notes {
            payment = payment.with_notes(notes);
        }

        insert_payment(&mut tx, &payment).await?;

        let outcome = match target {
            Some(row) => {
                let (paid, due, status) =
                    apply_amounts(row.total_amount, row.paid_amount, payment.amount);
                sqlx::query(
                    r#"
                    UPDATE invoices
                    SET paid_amount = $2, due_amount = $3, status = $4, updated_at = $5
                    WHERE invoice_id = $1
                    "#,
                )
                .bind(row.invoice_id)
                .bind(paid)
                .bind(due)
                .bind(InvoiceStatus::from(status))
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;

                debug!(
                    payment_id = %payment.id,
                    invoice_id = %row.invoice_id,
                    amount = %payment.amount,
                    status = ?status,
                    "payment applied to invoice"
                );

                PaymentOutcome {
                    payment_id: payment.id,
                    invoice_id: Some(row.invoice_id.into()),
                    status,
                }
            }
            None => PaymentOutcome {
                payment_id: payment.id,
                invoice_id: None,
                status: DomainInvoiceStatus::Pending,
            },
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Administrative override of an invoice's status
    ///
    /// Forcing `Paid` settles the amounts; `Partial` and `Pending`
    /// change the tag only. An unknown invoice id is a silent no-op.
    ///
    /// # Arguments
    ///
    /// * `invoice_id` - The invoice to override
    /// * `status` - The status to force
    pub async fn set_invoice_status(
        &self,
        invoice_id: InvoiceId,
        status: DomainInvoiceStatus,
    ) -> Result<(), DatabaseError> {
        let result = if status == DomainInvoiceStatus::Paid {
            sqlx::query(
                r#"
                UPDATE invoices
                SET status = $2, paid_amount = total_amount, due_amount = 0, updated_at = $3
                WHERE invoice_id = $1
                "#,
            )
            .bind(*invoice_id.as_uuid())
            .bind(InvoiceStatus::from(status))
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
        } else {
            sqlx::query(
                r#"
                UPDATE invoices
                SET status = $2, updated_at = $3
                WHERE invoice_id = $1
                "#,
            )
            .bind(*invoice_id.as_uuid())
            .bind(InvoiceStatus::from(status))
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
        };

        if result.rows_affected() == 0 {
            debug!(invoice_id = %invoice_id, "status override on unknown invoice ignored");
        }
        Ok(())
    }

    /// Deletes a payment
    ///
    /// Invoice amounts already reconciled stay as they are.
    ///
    /// # Arguments
    ///
    /// * `payment_id` - The payment to delete
    pub async fn delete_payment(&self, payment_id: PaymentId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM payments WHERE payment_id = $1")
            .bind(*payment_id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Payment", payment_id));
        }
        Ok(())
    }

    /// Retrieves an invoice with its billed lines
    ///
    /// # Arguments
    ///
    /// * `invoice_id` - The invoice identifier
    pub async fn get_invoice(&self, invoice_id: InvoiceId) -> Result<Invoice, DatabaseError> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT
                invoice_id, invoice_number, customer_id, invoice_date,
                period_start, period_end, total_quantity, total_amount,
                paid_amount, due_amount, status, created_at, updated_at
            FROM invoices
            WHERE invoice_id = $1
            "#,
        )
        .bind(*invoice_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Invoice", invoice_id))?;

        let mut conn = self.pool.acquire().await?;
        let lines = load_invoice_lines(&mut conn, invoice_id).await?;
        Ok(row.into_domain(lines))
    }

    /// Looks an invoice up by its human-readable number
    ///
    /// # Arguments
    ///
    /// * `invoice_number` - The invoice number
    pub async fn find_by_number(
        &self,
        invoice_number: &str,
    ) -> Result<Option<Invoice>, DatabaseError> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT
                invoice_id, invoice_number, customer_id, invoice_date,
                period_start, period_end, total_quantity, total_amount,
                paid_amount, due_amount, status, created_at, updated_at
            FROM invoices
            WHERE invoice_number = $1
            "#,
        )
        .bind(invoice_number)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let mut conn = self.pool.acquire().await?;
                let lines = load_invoice_lines(&mut conn, row.invoice_id.into()).await?;
                Ok(Some(row.into_domain(lines)))
            }
            None => Ok(None),
        }
    }

    /// Retrieves a customer's invoices, oldest first
    ///
    /// Headers only; load a single invoice for its lines.
    ///
    /// # Arguments
    ///
    /// * `customer_id` - The customer identifier
    pub async fn invoices_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<InvoiceRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT
                invoice_id, invoice_number, customer_id, invoice_date,
                period_start, period_end, total_quantity, total_amount,
                paid_amount, due_amount, status, created_at, updated_at
            FROM invoices
            WHERE customer_id = $1
            ORDER BY invoice_date ASC, created_at ASC, invoice_id ASC
            "#,
        )
        .bind(*customer_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Retrieves a customer's payments, newest first
    ///
    /// # Arguments
    ///
    /// * `customer_id` - The customer identifier
    pub async fn payments_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Payment>, DatabaseError> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT
                payment_id, customer_id, invoice_id, amount, payment_date,
                method, reference_number, notes, received_by, created_at
            FROM payments
            WHERE customer_id = $1
            ORDER BY payment_date DESC, created_at DESC
            "#,
        )
        .bind(*customer_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PaymentRow::into_domain).collect())
    }
}

async fn load_billed_deliveries(
    conn: &mut PgConnection,
    customer_id: CustomerId,
    delivery_ids: &[DeliveryId],
) -> Result<Vec<BilledDelivery>, DatabaseError> {
    let ids: Vec<Uuid> = delivery_ids.iter().map(|d| *d.as_uuid()).collect();
    let rows = sqlx::query_as::<_, BilledDeliveryRow>(
        r#"
        SELECT delivery_id, customer_id, quantity, total_amount
        FROM delivery_events
        WHERE delivery_id = ANY($1)
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    for delivery_id in delivery_ids {
        let row = rows
            .iter()
            .find(|r| r.delivery_id == *delivery_id.as_uuid())
            .ok_or_else(|| DatabaseError::not_found("Delivery", delivery_id))?;
        if row.customer_id != *customer_id.as_uuid() {
            return Err(DatabaseError::Validation(format!(
                "delivery '{}' does not belong to customer '{}'",
                delivery_id, customer_id
            )));
        }
    }

    Ok(rows
        .into_iter()
        .map(|r| BilledDelivery {
            delivery_id: r.delivery_id.into(),
            quantity: r.quantity,
            amount: r.total_amount,
        })
        .collect())
}

async fn lock_invoice(
    conn: &mut PgConnection,
    invoice_id: InvoiceId,
) -> Result<Option<InvoiceRow>, DatabaseError> {
    let row = sqlx::query_as::<_, InvoiceRow>(
        r#"
        SELECT
            invoice_id, invoice_number, customer_id, invoice_date,
            period_start, period_end, total_quantity, total_amount,
            paid_amount, due_amount, status, created_at, updated_at
        FROM invoices
        WHERE invoice_id = $1
        FOR UPDATE
        "#,
    )
    .bind(*invoice_id.as_uuid())
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

/// Locks the customer's oldest unsettled invoice, if one exists
///
/// Ordering mirrors the domain selection rule: earliest invoice date
/// first, ties broken by creation time then id. Selecting and locking
/// in one statement keeps concurrent payments serialized on the same
/// invoice.
async fn lock_oldest_open_invoice(
    conn: &mut PgConnection,
    customer_id: CustomerId,
) -> Result<Option<InvoiceRow>, DatabaseError> {
    let row = sqlx::query_as::<_, InvoiceRow>(
        r#"
        SELECT
            invoice_id, invoice_number, customer_id, invoice_date,
            period_start, period_end, total_quantity, total_amount,
            paid_amount, due_amount, status, created_at, updated_at
        FROM invoices
        WHERE customer_id = $1 AND status <> 'paid'
        ORDER BY invoice_date ASC, created_at ASC, invoice_id ASC
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(*customer_id.as_uuid())
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

async fn insert_payment(
    conn: &mut PgConnection,
    payment: &Payment,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO payments (
            payment_id, customer_id, invoice_id, amount, payment_date,
            method, reference_number, notes, received_by, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(*payment.id.as_uuid())
    .bind(*payment.customer_id.as_uuid())
    .bind(payment.invoice_id.map(|i| *i.as_uuid()))
    .bind(payment.amount)
    .bind(payment.payment_date)
    .bind(PaymentMethod::from(payment.method))
    .bind(&payment.reference_number)
    .bind(&payment.notes)
    .bind(payment.received_by.map(|s| *s.as_uuid()))
    .bind(payment.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn load_invoice_lines(
    conn: &mut PgConnection,
    invoice_id: InvoiceId,
) -> Result<Vec<BilledDelivery>, DatabaseError> {
    let rows = sqlx::query_as::<_, InvoiceItemRow>(
        r#"
        SELECT item_id, invoice_id, delivery_id, quantity, amount
        FROM invoice_items
        WHERE invoice_id = $1
        ORDER BY item_id ASC
        "#,
    )
    .bind(*invoice_id.as_uuid())
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| BilledDelivery {
            delivery_id: r.delivery_id.into(),
            quantity: r.quantity,
            amount: r.amount,
        })
        .collect())
}

/// Invoice status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invoice_status", rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Partial,
    Paid,
}

impl From<DomainInvoiceStatus> for InvoiceStatus {
    fn from(status: DomainInvoiceStatus) -> Self {
        match status {
            DomainInvoiceStatus::Pending => InvoiceStatus::Pending,
            DomainInvoiceStatus::Partial => InvoiceStatus::Partial,
            DomainInvoiceStatus::Paid => InvoiceStatus::Paid,
        }
    }
}

impl From<InvoiceStatus> for DomainInvoiceStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Pending => DomainInvoiceStatus::Pending,
            InvoiceStatus::Partial => DomainInvoiceStatus::Partial,
            InvoiceStatus::Paid => DomainInvoiceStatus::Paid,
        }
    }
}

/// Payment method enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Online,
    Cheque,
    Other,
}

impl From<DomainPaymentMethod> for PaymentMethod {
    fn from(method: DomainPaymentMethod) -> Self {
        match method {
            DomainPaymentMethod::Cash => PaymentMethod::Cash,
            DomainPaymentMethod::Online => PaymentMethod::Online,
            DomainPaymentMethod::Cheque => PaymentMethod::Cheque,
            DomainPaymentMethod::Other => PaymentMethod::Other,
        }
    }
}

impl From<PaymentMethod> for DomainPaymentMethod {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Cash => DomainPaymentMethod::Cash,
            PaymentMethod::Online => DomainPaymentMethod::Online,
            PaymentMethod::Cheque => DomainPaymentMethod::Cheque,
            PaymentMethod::Other => DomainPaymentMethod::Other,
        }
    }
}

/// Database row for an invoice
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InvoiceRow {
    pub invoice_id: Uuid,
    pub invoice_number: String,
    pub customer_id: Uuid,
    pub invoice_date: NaiveDate,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_quantity: Decimal,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub due_amount: Decimal,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InvoiceRow {
    /// Converts the row and its loaded lines into the domain invoice
    pub fn into_domain(self, lines: Vec<BilledDelivery>) -> Invoice {
        Invoice {
            id: self.invoice_id.into(),
            invoice_number: self.invoice_number,
            customer_id: self.customer_id.into(),
            invoice_date: self.invoice_date,
            period: BillingPeriod {
                start: self.period_start,
                end: self.period_end,
            },
            total_quantity: self.total_quantity,
            total_amount: self.total_amount,
            paid_amount: self.paid_amount,
            due_amount: self.due_amount,
            status: self.status.into(),
            lines,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Database row for an invoice item
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InvoiceItemRow {
    pub item_id: Uuid,
    pub invoice_id: Uuid,
    pub delivery_id: Uuid,
    pub quantity: Decimal,
    pub amount: Decimal,
}

/// Database row for a payment
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentRow {
    pub payment_id: Uuid,
    pub customer_id: Uuid,
    pub invoice_id: Option<Uuid>,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub method: PaymentMethod,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub received_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl PaymentRow {
    /// Converts the row into its domain representation
    pub fn into_domain(self) -> Payment {
        Payment {
            id: self.payment_id.into(),
            customer_id: self.customer_id.into(),
            invoice_id: self.invoice_id.map(Into::into),
            amount: self.amount,
            payment_date: self.payment_date,
            method: self.method.into(),
            reference_number: self.reference_number,
            notes: self.notes,
            received_by: self.received_by.map(Into::into),
            created_at: self.created_at,
        }
    }
}

/// Joined row for the deliveries an invoice bills
#[derive(Debug, Clone, sqlx::FromRow)]
struct BilledDeliveryRow {
    delivery_id: Uuid,
    customer_id: Uuid,
    quantity: Decimal,
    total_amount: Decimal,
}

/// Data for issuing a new invoice
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub customer_id: CustomerId,
    /// Generated when absent
    pub invoice_number: Option<String>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub delivery_ids: Vec<DeliveryId>,
}

/// Data for recording a new payment
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub customer_id: CustomerId,
    pub amount: Decimal,
    /// Defaults to today when absent
    pub payment_date: Option<NaiveDate>,
    /// Defaults to cash when absent
    pub method: Option<DomainPaymentMethod>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    /// Invoice to apply the amount to; the oldest open one when absent
    pub invoice_id: Option<InvoiceId>,
    pub received_by: Option<StaffId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invoice_row_into_domain() {
        let row = InvoiceRow {
            invoice_id: Uuid::new_v4(),
            invoice_number: "INV-2024-0107".to_string(),
            customer_id: Uuid::new_v4(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            period_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            total_quantity: dec!(62),
            total_amount: dec!(3100),
            paid_amount: dec!(1000),
            due_amount: dec!(2100),
            status: InvoiceStatus::Partial,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let invoice = row.clone().into_domain(vec![]);
        assert_eq!(*invoice.id.as_uuid(), row.invoice_id);
        assert_eq!(invoice.period.days(), 31);
        assert_eq!(invoice.status, DomainInvoiceStatus::Partial);
        assert!(!invoice.is_settled());
    }

    #[test]
    fn test_method_round_trip() {
        let all = [
            DomainPaymentMethod::Cash,
            DomainPaymentMethod::Online,
            DomainPaymentMethod::Cheque,
            DomainPaymentMethod::Other,
        ];
        for method in all {
            let db: PaymentMethod = method.into();
            let back: DomainPaymentMethod = db.into();
            assert_eq!(back, method);
        }
    }
}
