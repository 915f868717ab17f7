//! Product catalog repository implementation
//!
//! This module provides database access for catalog products. Product
//! registration seeds the stock balance and optionally the first price
//! interval; product updates can carry a manual stock override and a
//! price change, which run through the same stock and pricing paths as
//! everything else.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::ProductId;
use domain_inventory::{Product, StockBalance};

use crate::error::DatabaseError;
use crate::repositories::inventory::{override_stock, seed_balance};
use crate::repositories::pricing::record_price_tx;

/// Repository for managing the product catalog
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registers a new catalog product
    ///
    /// Seeds a stock balance row (zero unless an initial quantity is
    /// given) and records the initial price, when given, effective
    /// today. Duplicate names surface as a conflict.
    ///
    /// # Arguments
    ///
    /// * `new` - The product data
    ///
    /// # Returns
    ///
    /// The registered product
    pub async fn register_product(&self, new: NewProduct) -> Result<Product, DatabaseError> {
        let mut product = Product::new(new.name, new.category, new.unit)?;
        if let Some(description) = new.description {
            product = product.with_description(description);
        }
        if let Some(quantity) = new.min_order_quantity {
            product = product.with_min_order_quantity(quantity);
        }

        let mut tx = self.pool.begin().await?;

        insert_product(&mut tx, &product).await?;

        let mut balance = StockBalance::new(product.id);
        if let Some(quantity) = new.initial_stock {
            balance.set_quantity(quantity);
        }
        seed_balance(&mut tx, &balance).await?;

        if let Some(price) = new.initial_price {
            let today = Utc::now().date_naive();
            record_price_tx(&mut tx, product.id, price, today, None).await?;
        }

        tx.commit().await?;
        Ok(product)
    }

    /// Updates a catalog product
    ///
    /// Only the fields present in `changes` move. A stock quantity in
    /// the changes is a manual override of the balance; a price per
    /// unit records a price change effective today.
    ///
    /// # Arguments
    ///
    /// * `product_id` - The product to update
    /// * `changes` - The fields to change
    pub async fn update_product(
        &self,
        product_id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                product_id,
                name,
                category,
                unit,
                description,
                min_order_quantity,
                created_at,
                updated_at
            FROM products
            WHERE product_id = $1
            FOR UPDATE
            "#,
        )
        .bind(*product_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Product", product_id))?;

        let mut product = row.into_domain();
        if let Some(name) = changes.name {
            product.rename(name)?;
        }
        if let Some(category) = changes.category {
            product.category = category;
        }
        if let Some(unit) = changes.unit {
            product.unit = unit;
        }
        if let Some(description) = changes.description {
            product.description = Some(description);
        }
        if let Some(quantity) = changes.min_order_quantity {
            product.min_order_quantity = Some(quantity);
        }
        product.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE products
            SET name = $2, category = $3, unit = $4, description = $5,
                min_order_quantity = $6, updated_at = $7
            WHERE product_id = $1
            "#,
        )
        .bind(*product.id.as_uuid())
        .bind(&product.name)
        .bind(ProductCategory::from(product.category))
        .bind(&product.unit)
        .bind(&product.description)
        .bind(product.min_order_quantity)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await?;

        if let Some(quantity) = changes.stock_quantity {
            override_stock(&mut tx, product_id, quantity).await?;
        }
        if let Some(price) = changes.price_per_unit {
            let today = Utc::now().date_naive();
            record_price_tx(&mut tx, product_id, price, today, None).await?;
        }

        tx.commit().await?;
        Ok(product)
    }

    /// Deletes a product from the catalog
    ///
    /// Price intervals and the stock balance go with it; products with
    /// recorded receipts, deliveries, or order lines are protected by
    /// foreign keys and surface a violation instead.
    ///
    /// # Arguments
    ///
    /// * `product_id` - The product to delete
    pub async fn delete_product(&self, product_id: ProductId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(*product_id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Product", product_id));
        }
        Ok(())
    }

    /// Retrieves a product by id
    ///
    /// # Arguments
    ///
    /// * `product_id` - The product identifier
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product, DatabaseError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                product_id,
                name,
                category,
                unit,
                description,
                min_order_quantity,
                created_at,
                updated_at
            FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(*product_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Product", product_id))?;

        Ok(row.into_domain())
    }

    /// Retrieves every catalog product, ordered by name
    pub async fn list_products(&self) -> Result<Vec<Product>, DatabaseError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                product_id,
                name,
                category,
                unit,
                description,
                min_order_quantity,
                created_at,
                updated_at
            FROM products
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_domain).collect())
    }
}

async fn insert_product(
    conn: &mut sqlx::PgConnection,
    product: &Product,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO products (
            product_id, name, category, unit, description,
            min_order_quantity, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(*product.id.as_uuid())
    .bind(&product.name)
    .bind(ProductCategory::from(product.category))
    .bind(&product.unit)
    .bind(&product.description)
    .bind(product.min_order_quantity)
    .bind(product.created_at)
    .bind(product.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Product category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "product_category", rename_all = "snake_case")]
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

impl From<domain_inventory::ProductCategory> for ProductCategory {
    fn from(category: domain_inventory::ProductCategory) -> Self {
        match category {
            domain_inventory::ProductCategory::CowMilk => ProductCategory::CowMilk,
            domain_inventory::ProductCategory::BuffaloMilk => ProductCategory::BuffaloMilk,
            domain_inventory::ProductCategory::Curd => ProductCategory::Curd,
            domain_inventory::ProductCategory::Ghee => ProductCategory::Ghee,
            domain_inventory::ProductCategory::Other => ProductCategory::Other,
        }
    }
}

impl From<ProductCategory> for domain_inventory::ProductCategory {
    fn from(category: ProductCategory) -> Self {
        match category {
            ProductCategory::CowMilk => domain_inventory::ProductCategory::CowMilk,
            ProductCategory::BuffaloMilk => domain_inventory::ProductCategory::BuffaloMilk,
            ProductCategory::Curd => domain_inventory::ProductCategory::Curd,
            ProductCategory::Ghee => domain_inventory::ProductCategory::Ghee,
            ProductCategory::Other => domain_inventory::ProductCategory::Other,
        }
    }
}

/// Database row for a product
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub product_id: Uuid,
    pub name: String,
    pub category: ProductCategory,
    pub unit: String,
    pub description: Option<String>,
    pub min_order_quantity: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRow {
    /// Converts the row into its domain representation
    pub fn into_domain(self) -> Product {
        Product {
            id: self.product_id.into(),
            name: self.name,
            category: self.category.into(),
            unit: self.unit,
            description: self.description,
            min_order_quantity: self.min_order_quantity,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Data for registering a new product
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category: domain_inventory::ProductCategory,
    pub unit: String,
    pub description: Option<String>,
    pub min_order_quantity: Option<Decimal>,
    /// Opening stock quantity; defaults to zero
    pub initial_stock: Option<Decimal>,
    /// Opening price per unit, recorded effective today
    pub initial_price: Option<Decimal>,
}

/// Fields of a product update; `None` leaves the current value
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub category: Option<domain_inventory::ProductCategory>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub min_order_quantity: Option<Decimal>,
    /// Manual stock override, floored at zero
    pub stock_quantity: Option<Decimal>,
    /// New price per unit, recorded effective today
    pub price_per_unit: Option<Decimal>,
}
