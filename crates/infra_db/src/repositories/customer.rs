//! Customer repository implementation
//!
//! This module provides database access for subscriber master data.
//! Phone and email carry unique constraints; duplicates surface as
//! conflicts rather than silently overwriting.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::CustomerId;
use domain_customer::{Customer, CustomerUpdate};

use crate::error::DatabaseError;

/// Repository for managing customers
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registers a new customer
    ///
    /// # Arguments
    ///
    /// * `new` - The customer data
    ///
    /// # Returns
    ///
    /// The registered customer
    pub async fn create_customer(&self, new: NewCustomer) -> Result<Customer, DatabaseError> {
        let mut customer = Customer::new(new.name, new.phone, new.registered_by)?;
        if let Some(address) = new.address {
            customer = customer.with_address(address);
        }
        if let Some(email) = new.email {
            customer = customer.with_email(email)?;
        }
        if let Some(quantity) = new.daily_quantity {
            customer = customer.with_daily_quantity(quantity)?;
        }
        if let Some(milk_type) = new.milk_type {
            customer = customer.with_milk_type(milk_type);
        }

        sqlx::query(
            r#"
            INSERT INTO customers (
                customer_id, name, address, phone, email, daily_quantity,
                milk_type, delivery_status, registered_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(*customer.id.as_uuid())
        .bind(&customer.name)
        .bind(&customer.address)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(customer.daily_quantity)
        .bind(MilkType::from(customer.milk_type))
        .bind(DeliveryStatus::from(customer.delivery_status))
        .bind(customer.registered_by.map(|s| *s.as_uuid()))
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Applies a partial update to a customer
    ///
    /// Only the fields present in `update` change; the result is
    /// validated as a whole before anything is written.
    ///
    /// # Arguments
    ///
    /// * `customer_id` - The customer to update
    /// * `update` - The fields to change
    pub async fn update_customer(
        &self,
        customer_id: CustomerId,
        update: CustomerUpdate,
    ) -> Result<Customer, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT
                customer_id,
                name,
                address,
                phone,
                email,
                daily_quantity,
                milk_type,
                delivery_status,
                registered_by,
                created_at,
                updated_at
            FROM customers
            WHERE customer_id = $1
            FOR UPDATE
            "#,
        )
        .bind(*customer_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Customer", customer_id))?;

        let mut customer = row.into_domain();
        customer.apply_update(update)?;

        sqlx::query(
            r#"
            UPDATE customers
            SET name = $2, address = $3, phone = $4, email = $5, daily_quantity = $6,
                milk_type = $7, delivery_status = $8, updated_at = $9
            WHERE customer_id = $1
            "#,
        )
        .bind(*customer.id.as_uuid())
        .bind(&customer.name)
        .bind(&customer.address)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(customer.daily_quantity)
        .bind(MilkType::from(customer.milk_type))
        .bind(DeliveryStatus::from(customer.delivery_status))
        .bind(customer.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(customer)
    }

    /// Changes a customer's delivery status
    ///
    /// # Arguments
    ///
    /// * `customer_id` - The customer to update
    /// * `status` - The new delivery status
    pub async fn set_delivery_status(
        &self,
        customer_id: CustomerId,
        status: domain_customer::DeliveryStatus,
    ) -> Result<Customer, DatabaseError> {
        self.update_customer(
            customer_id,
            CustomerUpdate {
                delivery_status: Some(status),
                ..CustomerUpdate::default()
            },
        )
        .await
    }

    /// Deletes a customer
    ///
    /// Customers with recorded deliveries are protected by a foreign
    /// key and surface a violation instead.
    ///
    /// # Arguments
    ///
    /// * `customer_id` - The customer to delete
    pub async fn delete_customer(&self, customer_id: CustomerId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM customers WHERE customer_id = $1")
            .bind(*customer_id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Customer", customer_id));
        }
        Ok(())
    }

    /// Retrieves a customer by id
    ///
    /// # Arguments
    ///
    /// * `customer_id` - The customer identifier
    pub async fn get_customer(&self, customer_id: CustomerId) -> Result<Customer, DatabaseError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT
                customer_id,
                name,
                address,
                phone,
                email,
                daily_quantity,
                milk_type,
                delivery_status,
                registered_by,
                created_at,
                updated_at
            FROM customers
            WHERE customer_id = $1
            "#,
        )
        .bind(*customer_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Customer", customer_id))?;

        Ok(row.into_domain())
    }

    /// Retrieves every customer, ordered by name
    pub async fn list_customers(&self) -> Result<Vec<Customer>, DatabaseError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT
                customer_id,
                name,
                address,
                phone,
                email,
                daily_quantity,
                milk_type,
                delivery_status,
                registered_by,
                created_at,
                updated_at
            FROM customers
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CustomerRow::into_domain).collect())
    }

    /// Retrieves the customers currently on the delivery round
    pub async fn deliverable_customers(&self) -> Result<Vec<Customer>, DatabaseError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT
                customer_id,
                name,
                address,
                phone,
                email,
                daily_quantity,
                milk_type,
                delivery_status,
                registered_by,
                created_at,
                updated_at
            FROM customers
            WHERE delivery_status = 'active'
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CustomerRow::into_domain).collect())
    }
}

/// Milk type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "milk_type", rename_all = "snake_case")]
pub enum MilkType {
    Cow,
    Buffalo,
    Both,
}

impl From<domain_customer::MilkType> for MilkType {
    fn from(milk_type: domain_customer::MilkType) -> Self {
        match milk_type {
            domain_customer::MilkType::Cow => MilkType::Cow,
            domain_customer::MilkType::Buffalo => MilkType::Buffalo,
            domain_customer::MilkType::Both => MilkType::Both,
        }
    }
}

impl From<MilkType> for domain_customer::MilkType {
    fn from(milk_type: MilkType) -> Self {
        match milk_type {
            MilkType::Cow => domain_customer::MilkType::Cow,
            MilkType::Buffalo => domain_customer::MilkType::Buffalo,
            MilkType::Both => domain_customer::MilkType::Both,
        }
    }
}

/// Delivery status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "customer_delivery_status", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Active,
    Paused,
    Inactive,
}

impl From<domain_customer::DeliveryStatus> for DeliveryStatus {
    fn from(status: domain_customer::DeliveryStatus) -> Self {
        match status {
            domain_customer::DeliveryStatus::Active => DeliveryStatus::Active,
            domain_customer::DeliveryStatus::Paused => DeliveryStatus::Paused,
            domain_customer::DeliveryStatus::Inactive => DeliveryStatus::Inactive,
        }
    }
}

impl From<DeliveryStatus> for domain_customer::DeliveryStatus {
    fn from(status: DeliveryStatus) -> Self {
        match status {
            DeliveryStatus::Active => domain_customer::DeliveryStatus::Active,
            DeliveryStatus::Paused => domain_customer::DeliveryStatus::Paused,
            DeliveryStatus::Inactive => domain_customer::DeliveryStatus::Inactive,
        }
    }
}

/// Database row for a customer
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerRow {
    pub customer_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub daily_quantity: Decimal,
    pub milk_type: MilkType,
    pub delivery_status: DeliveryStatus,
    pub registered_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerRow {
    /// Converts the row into its domain representation
    pub fn into_domain(self) -> Customer {
        Customer {
            id: self.customer_id.into(),
            name: self.name,
            address: self.address,
            phone: self.phone,
            email: self.email,
            daily_quantity: self.daily_quantity,
            milk_type: self.milk_type.into(),
            delivery_status: self.delivery_status.into(),
            registered_by: self.registered_by.map(Into::into),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Data for registering a new customer
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub email: Option<String>,
    pub daily_quantity: Option<Decimal>,
    pub milk_type: Option<domain_customer::MilkType>,
    pub registered_by: Option<core_kernel::StaffId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        let all = [
            domain_customer::DeliveryStatus::Active,
            domain_customer::DeliveryStatus::Paused,
            domain_customer::DeliveryStatus::Inactive,
        ];
        for status in all {
            let db: DeliveryStatus = status.into();
            let back: domain_customer::DeliveryStatus = db.into();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_customer_row_into_domain() {
        let row = CustomerRow {
            customer_id: Uuid::new_v4(),
            name: "Asha Stores".to_string(),
            address: Some("12 Temple Road".to_string()),
            phone: "0771234567".to_string(),
            email: None,
            daily_quantity: Decimal::from(2),
            milk_type: MilkType::Buffalo,
            delivery_status: DeliveryStatus::Paused,
            registered_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let customer = row.clone().into_domain();
        assert_eq!(*customer.id.as_uuid(), row.customer_id);
        assert_eq!(customer.milk_type, domain_customer::MilkType::Buffalo);
        assert!(!customer.delivery_status.is_deliverable());
    }
}
