//! Customer aggregate
//!
//! A customer is a household or shop on a delivery round. The aggregate
//! carries contact details, the standing daily order, and the delivery
//! status drivers check each morning.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{CustomerId, StaffId};

use crate::error::CustomerError;

/// The milk the customer takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MilkType {
    Cow,
    Buffalo,
    /// Takes both, split per delivery
    Both,
}

/// Whether the customer currently receives deliveries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    /// On the daily round
    Active,
    /// Temporarily skipped (vacation, request)
    Paused,
    /// Off the round until reactivated
    Inactive,
}

impl DeliveryStatus {
    /// Returns true if deliveries should be made to this customer
    pub fn is_deliverable(&self) -> bool {
        matches!(self, DeliveryStatus::Active)
    }
}

/// A subscribed customer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Customer {
    /// Unique identifier
    pub id: CustomerId,
    /// Customer or shop name
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// Delivery address
    pub address: Option<String>,
    /// Contact phone, unique across customers
    #[validate(length(min = 7, max = 20))]
    pub phone: String,
    /// Contact email, unique when present
    #[validate(email)]
    pub email: Option<String>,
    /// Standing daily order quantity
    pub daily_quantity: Decimal,
    /// Milk preference
    pub milk_type: MilkType,
    /// Current delivery status
    pub delivery_status: DeliveryStatus,
    /// Staff member who registered the customer
    pub registered_by: Option<StaffId>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Last updated timestamp
    pub updated_at: DateTime<Utc>,
}

/// Partial update to a customer's master data
///
/// Only the fields that are `Some` change; everything else keeps its
/// current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub daily_quantity: Option<Decimal>,
    pub milk_type: Option<MilkType>,
    pub delivery_status: Option<DeliveryStatus>,
}

impl Customer {
    /// Registers a new customer
    ///
    /// New customers start active with a zero standing order.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        registered_by: Option<StaffId>,
    ) -> Result<Self, CustomerError> {
        let now = Utc::now();
        let customer = Self {
            id: CustomerId::new_v7(),
            name: name.into(),
            address: None,
            phone: phone.into(),
            email: None,
            daily_quantity: Decimal::ZERO,
            milk_type: MilkType::Cow,
            delivery_status: DeliveryStatus::Active,
            registered_by,
            created_at: now,
            updated_at: now,
        };
        customer.validate()?;
        Ok(customer)
    }

    /// Sets the delivery address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the contact email
    pub fn with_email(mut self, email: impl Into<String>) -> Result<Self, CustomerError> {
        self.email = Some(email.into());
        self.validate()?;
        Ok(self)
    }

    /// Sets the standing daily order
    pub fn with_daily_quantity(mut self, quantity: Decimal) -> Result<Self, CustomerError> {
        validate_daily_quantity(quantity)?;
        self.daily_quantity = quantity;
        Ok(self)
    }

    /// Sets the milk preference
    pub fn with_milk_type(mut self, milk_type: MilkType) -> Self {
        self.milk_type = milk_type;
        self
    }

    /// Applies a partial update, validating the result
    pub fn apply_update(&mut self, update: CustomerUpdate) -> Result<(), CustomerError> {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(address) = update.address {
            self.address = Some(address);
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(email) = update.email {
            self.email = Some(email);
        }
        if let Some(quantity) = update.daily_quantity {
            validate_daily_quantity(quantity)?;
            self.daily_quantity = quantity;
        }
        if let Some(milk_type) = update.milk_type {
            self.milk_type = milk_type;
        }
        if let Some(status) = update.delivery_status {
            self.delivery_status = status;
        }
        self.validate()?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Takes the customer off the round temporarily
    pub fn pause(&mut self) {
        self.delivery_status = DeliveryStatus::Paused;
        self.updated_at = Utc::now();
    }

    /// Puts the customer back on the round
    pub fn resume(&mut self) {
        self.delivery_status = DeliveryStatus::Active;
        self.updated_at = Utc::now();
    }

    /// Removes the customer from the round until reactivated
    pub fn deactivate(&mut self) {
        self.delivery_status = DeliveryStatus::Inactive;
        self.updated_at = Utc::now();
    }
}

fn validate_daily_quantity(quantity: Decimal) -> Result<(), CustomerError> {
    if quantity < Decimal::ZERO {
        return Err(CustomerError::InvalidQuantity(format!(
            "daily quantity must not be negative, got {quantity}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_customer_defaults() {
        let customer = Customer::new("Asha Stores", "0771234567", None).unwrap();

        assert_eq!(customer.delivery_status, DeliveryStatus::Active);
        assert_eq!(customer.daily_quantity, Decimal::ZERO);
        assert_eq!(customer.milk_type, MilkType::Cow);
    }

    #[test]
    fn test_contact_validation() {
        assert!(Customer::new("", "0771234567", None).is_err());
        assert!(Customer::new("Asha Stores", "12", None).is_err());

        let bad_email = Customer::new("Asha Stores", "0771234567", None)
            .unwrap()
            .with_email("not-an-email");
        assert!(matches!(bad_email, Err(CustomerError::Validation(_))));
    }

    #[test]
    fn test_partial_update_leaves_other_fields() {
        let mut customer = Customer::new("Asha Stores", "0771234567", None)
            .unwrap()
            .with_daily_quantity(dec!(2.5))
            .unwrap();

        customer
            .apply_update(CustomerUpdate {
                address: Some("12 Temple Road".to_string()),
                milk_type: Some(MilkType::Buffalo),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(customer.address.as_deref(), Some("12 Temple Road"));
        assert_eq!(customer.milk_type, MilkType::Buffalo);
        assert_eq!(customer.name, "Asha Stores");
        assert_eq!(customer.daily_quantity, dec!(2.5));
    }

    #[test]
    fn test_negative_daily_quantity_rejected() {
        let mut customer = Customer::new("Asha Stores", "0771234567", None).unwrap();
        let result = customer.apply_update(CustomerUpdate {
            daily_quantity: Some(dec!(-1)),
            ..Default::default()
        });

        assert!(matches!(result, Err(CustomerError::InvalidQuantity(_))));
    }

    #[test]
    fn test_status_transitions() {
        let mut customer = Customer::new("Asha Stores", "0771234567", None).unwrap();
        assert!(customer.delivery_status.is_deliverable());

        customer.pause();
        assert_eq!(customer.delivery_status, DeliveryStatus::Paused);
        assert!(!customer.delivery_status.is_deliverable());

        customer.resume();
        assert_eq!(customer.delivery_status, DeliveryStatus::Active);

        customer.deactivate();
        assert_eq!(customer.delivery_status, DeliveryStatus::Inactive);
    }
}
