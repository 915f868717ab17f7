//! Product catalog aggregate
//!
//! Products are the axis every other record hangs off: price intervals,
//! stock balances, receipts, deliveries, and order items all reference
//! one. Names are unique across the catalog.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::ProductId;

use crate::error::InventoryError;

/// Product classification
///
/// An explicit stored field; callers pick the category at registration
/// time instead of the system guessing from the product name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCategory {
    /// Fresh cow milk
    CowMilk,
    /// Fresh buffalo milk
    BuffaloMilk,
    /// Curd and fermented products
    Curd,
    /// Ghee and butter products
    Ghee,
    /// Anything else the dairy sells
    Other,
}

/// A sellable catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: ProductId,
    /// Display name, unique across the catalog
    pub name: String,
    /// Product classification
    pub category: ProductCategory,
    /// Sale unit (litre, packet, kg)
    pub unit: String,
    /// Optional description
    pub description: Option<String>,
    /// Minimum quantity per order, if the product has one
    pub min_order_quantity: Option<Decimal>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Last updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new catalog product
    pub fn new(
        name: impl Into<String>,
        category: ProductCategory,
        unit: impl Into<String>,
    ) -> Result<Self, InventoryError> {
        let name = name.into();
        let unit = unit.into();
        validate_name(&name)?;
        let now = Utc::now();
        Ok(Self {
            id: ProductId::new_v7(),
            name,
            category,
            unit,
            description: None,
            min_order_quantity: None,
            created_at: now,
            updated_at: now,
        })
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

    /// Renames the product
    ///
    /// Name uniqueness is enforced by storage; this validates shape only.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), InventoryError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), InventoryError> {
    if name.trim().is_empty() {
        return Err(InventoryError::InvalidProduct(
            "product name must not be blank".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_product_creation() {
        let product = Product::new("Full Cream Milk", ProductCategory::CowMilk, "litre")
            .unwrap()
            .with_min_order_quantity(dec!(0.5));

        assert_eq!(product.name, "Full Cream Milk");
        assert_eq!(product.category, ProductCategory::CowMilk);
        assert_eq!(product.min_order_quantity, Some(dec!(0.5)));
    }

    #[test]
    fn test_blank_name_rejected() {
        let result = Product::new("   ", ProductCategory::Other, "litre");
        assert!(matches!(result, Err(InventoryError::InvalidProduct(_))));
    }

    #[test]
    fn test_rename_validates() {
        let mut product = Product::new("Curd 500g", ProductCategory::Curd, "packet").unwrap();
        assert!(product.rename("").is_err());
        product.rename("Curd 1kg").unwrap();
        assert_eq!(product.name, "Curd 1kg");
    }
}
