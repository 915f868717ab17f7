//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else. Each builder produces the repository input
//! struct it is named after, ready to hand to the matching repository.

use chrono::NaiveDate;
use core_kernel::{CustomerId, DeliveryId, InvoiceId, ProductId, StaffId};
use domain_billing::PaymentMethod;
use domain_customer::MilkType;
use domain_inventory::ProductCategory;
use infra_db::repositories::{
    NewCustomer, NewDelivery, NewInvoice, NewOrder, NewOrderItem, NewPayment, NewProduct,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{unique_phone, unique_product_name, DecimalFixtures, TemporalFixtures};

/// Builder for constructing product registration data
pub struct TestProductBuilder {
    name: String,
    category: ProductCategory,
    unit: String,
    description: Option<String>,
    min_order_quantity: Option<Decimal>,
    initial_stock: Option<Decimal>,
    initial_price: Option<Decimal>,
}

impl Default for TestProductBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProductBuilder {
    /// Creates a new builder with default values
    ///
    /// The name is unique per call so shared-database tests never trip
    /// the catalog's unique name constraint.
    pub fn new() -> Self {
        Self {
            name: unique_product_name(),
            category: ProductCategory::CowMilk,
            unit: "litre".to_string(),
            description: None,
            min_order_quantity: None,
            initial_stock: None,
            initial_price: None,
        }
    }

    /// Sets the product name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the category
    pub fn with_category(mut self, category: ProductCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the measurement unit
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the minimum order quantity
    pub fn with_min_order_quantity(mut self, quantity: Decimal) -> Self {
        self.min_order_quantity = Some(quantity);
        self
    }

    /// Sets the opening stock
    pub fn with_initial_stock(mut self, quantity: Decimal) -> Self {
        self.initial_stock = Some(quantity);
        self
    }

    /// Sets the opening price, effective today
    pub fn with_initial_price(mut self, price: Decimal) -> Self {
        self.initial_price = Some(price);
        self
    }

    /// Builds the product registration data
    pub fn build(self) -> NewProduct {
        NewProduct {
            name: self.name,
            category: self.category,
            unit: self.unit,
            description: self.description,
            min_order_quantity: self.min_order_quantity,
            initial_stock: self.initial_stock,
            initial_price: self.initial_price,
        }
    }
}

/// Builder for constructing customer registration data
pub struct TestCustomerBuilder {
    name: String,
    phone: String,
    address: Option<String>,
    email: Option<String>,
    daily_quantity: Option<Decimal>,
    milk_type: Option<MilkType>,
    registered_by: Option<StaffId>,
}

impl Default for TestCustomerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCustomerBuilder {
    /// Creates a new builder with default values
    ///
    /// The phone is unique per call so shared-database tests never trip
    /// the unique phone constraint.
    pub fn new() -> Self {
        Self {
            name: crate::fixtures::random_customer_name(),
            phone: unique_phone(),
            address: None,
            email: None,
            daily_quantity: None,
            milk_type: None,
            registered_by: None,
        }
    }

    /// Sets the customer name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the phone number
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Sets the delivery address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the daily subscription quantity
    pub fn with_daily_quantity(mut self, quantity: Decimal) -> Self {
        self.daily_quantity = Some(quantity);
        self
    }

    /// Sets the milk type preference
    pub fn with_milk_type(mut self, milk_type: MilkType) -> Self {
        self.milk_type = Some(milk_type);
        self
    }

    /// Sets the registering staff member
    pub fn with_registered_by(mut self, staff: StaffId) -> Self {
        self.registered_by = Some(staff);
        self
    }

    /// Builds the customer registration data
    pub fn build(self) -> NewCustomer {
        NewCustomer {
            name: self.name,
            phone: self.phone,
            address: self.address,
            email: self.email,
            daily_quantity: self.daily_quantity,
            milk_type: self.milk_type,
            registered_by: self.registered_by,
        }
    }
}

/// Builder for constructing delivery data
pub struct TestDeliveryBuilder {
    customer_id: CustomerId,
    product_id: ProductId,
    delivery_date: Option<NaiveDate>,
    quantity: Decimal,
    unit_price: Option<Decimal>,
    notes: Option<String>,
    delivered_by: Option<StaffId>,
}

impl TestDeliveryBuilder {
    /// Creates a new builder for the given customer and product
    pub fn new(customer_id: CustomerId, product_id: ProductId) -> Self {
        Self {
            customer_id,
            product_id,
            delivery_date: Some(TemporalFixtures::delivery_date()),
            quantity: DecimalFixtures::morning_quantity(),
            unit_price: None,
            notes: None,
            delivered_by: None,
        }
    }

    /// Sets the delivery date
    pub fn with_delivery_date(mut self, date: NaiveDate) -> Self {
        self.delivery_date = Some(date);
        self
    }

    /// Leaves the delivery date to default to today
    pub fn with_todays_date(mut self) -> Self {
        self.delivery_date = None;
        self
    }

    /// Sets the quantity
    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets an explicit unit price, bypassing price resolution
    pub fn with_unit_price(mut self, price: Decimal) -> Self {
        self.unit_price = Some(price);
        self
    }

    /// Sets the notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Sets the delivering staff member
    pub fn with_delivered_by(mut self, staff: StaffId) -> Self {
        self.delivered_by = Some(staff);
        self
    }

    /// Builds the delivery data
    pub fn build(self) -> NewDelivery {
        NewDelivery {
            customer_id: self.customer_id,
            product_id: self.product_id,
            delivery_date: self.delivery_date,
            quantity: self.quantity,
            unit_price: self.unit_price,
            notes: self.notes,
            delivered_by: self.delivered_by,
        }
    }
}

/// Builder for constructing order data
pub struct TestOrderBuilder {
    customer_id: Option<CustomerId>,
    items: Vec<NewOrderItem>,
    payment_metadata: Option<serde_json::Value>,
    placed_by: Option<StaffId>,
}

impl Default for TestOrderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestOrderBuilder {
    /// Creates a new builder for a walk-in order with no items
    pub fn new() -> Self {
        Self {
            customer_id: None,
            items: Vec::new(),
            payment_metadata: None,
            placed_by: None,
        }
    }

    /// Sets the ordering customer
    pub fn for_customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Adds an order line
    pub fn with_item(mut self, product_id: ProductId, quantity: Decimal, unit_price: Decimal) -> Self {
        self.items.push(NewOrderItem {
            product_id,
            quantity,
            unit_price,
        });
        self
    }

    /// Sets the payment metadata payload
    pub fn with_payment_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.payment_metadata = Some(metadata);
        self
    }

    /// Sets the staff member at the counter
    pub fn with_placed_by(mut self, staff: StaffId) -> Self {
        self.placed_by = Some(staff);
        self
    }

    /// Builds the order data
    pub fn build(self) -> NewOrder {
        NewOrder {
            customer_id: self.customer_id,
            items: self.items,
            payment_metadata: self.payment_metadata,
            placed_by: self.placed_by,
        }
    }
}

/// Builder for constructing invoice data
pub struct TestInvoiceBuilder {
    customer_id: CustomerId,
    invoice_number: Option<String>,
    period_start: NaiveDate,
    period_end: NaiveDate,
    delivery_ids: Vec<DeliveryId>,
}

impl TestInvoiceBuilder {
    /// Creates a new builder for the given customer over January 2024
    pub fn new(customer_id: CustomerId) -> Self {
        let period = TemporalFixtures::january_period();
        Self {
            customer_id,
            invoice_number: None,
            period_start: period.start,
            period_end: period.end,
            delivery_ids: Vec::new(),
        }
    }

    /// Sets an explicit invoice number
    pub fn with_invoice_number(mut self, number: impl Into<String>) -> Self {
        self.invoice_number = Some(number.into());
        self
    }

    /// Sets the billed period
    pub fn with_period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.period_start = start;
        self.period_end = end;
        self
    }

    /// Adds a delivery to bill
    pub fn with_delivery(mut self, delivery_id: DeliveryId) -> Self {
        self.delivery_ids.push(delivery_id);
        self
    }

    /// Builds the invoice data
    pub fn build(self) -> NewInvoice {
        NewInvoice {
            customer_id: self.customer_id,
            invoice_number: self.invoice_number,
            period_start: self.period_start,
            period_end: self.period_end,
            delivery_ids: self.delivery_ids,
        }
    }
}

/// Builder for constructing payment data
pub struct TestPaymentBuilder {
    customer_id: CustomerId,
    amount: Decimal,
    payment_date: Option<NaiveDate>,
    method: Option<PaymentMethod>,
    reference_number: Option<String>,
    notes: Option<String>,
    invoice_id: Option<InvoiceId>,
    received_by: Option<StaffId>,
}

impl TestPaymentBuilder {
    /// Creates a new builder for the given customer
    pub fn new(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            amount: dec!(400),
            payment_date: Some(TemporalFixtures::february_start()),
            method: None,
            reference_number: None,
            notes: None,
            invoice_id: None,
            received_by: None,
        }
    }

    /// Sets the amount
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    /// Sets the payment date
    pub fn with_payment_date(mut self, date: NaiveDate) -> Self {
        self.payment_date = Some(date);
        self
    }

    /// Sets the payment method
    pub fn with_method(mut self, method: PaymentMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the external reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference_number = Some(reference.into());
        self
    }

    /// Addresses the payment to a specific invoice
    pub fn for_invoice(mut self, invoice_id: InvoiceId) -> Self {
        self.invoice_id = Some(invoice_id);
        self
    }

    /// Sets the receiving staff member
    pub fn with_received_by(mut self, staff: StaffId) -> Self {
        self.received_by = Some(staff);
        self
    }

    /// Builds the payment data
    pub fn build(self) -> NewPayment {
        NewPayment {
            customer_id: self.customer_id,
            amount: self.amount,
            payment_date: self.payment_date,
            method: self.method,
            reference_number: self.reference_number,
            notes: self.notes,
            invoice_id: self.invoice_id,
            received_by: self.received_by,
        }
    }
}
