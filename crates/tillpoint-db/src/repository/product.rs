//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - CRUD by id or by name (name is the human-facing business key)
//! - Alert threshold management
//! - Absolute stock overwrites
//!
//! ## Name Lookups
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Name → Id Resolution                             │
//! │                                                                     │
//! │  Operator types: "Ballpoint Pen"                                    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  id_from_name("Ballpoint Pen") ──► Some(17) or None                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  get_by_id(17) / set_stock(17, ...) / delete(17)                    │
//! │                                                                     │
//! │  Every by-name operation resolves the id first and delegates,       │
//! │  so the by-id path is the single source of truth.                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Overwrites, Not Deltas
//! `set_stock` writes an absolute value. Callers compute
//! `current ± delta` themselves, which means two instances racing on the
//! same product can lose an adjustment. Accepted for a single-till
//! deployment; checkout and returns, which must be correct, adjust stock
//! inside their own transactions instead.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use tillpoint_core::validation::{
    validate_alert_threshold, validate_price_cents, validate_product_name, validate_stock,
};
use tillpoint_core::{CoreError, Product, DEFAULT_ALERT_THRESHOLD};

// =============================================================================
// New Product Input
// =============================================================================

/// Input for creating a catalog product.
///
/// ## Example
/// ```rust,ignore
/// // Threshold defaults to 10
/// let pen = NewProduct::new("Ballpoint Pen", 200, 50);
///
/// // Or set it explicitly
/// let bulk = NewProduct::new("Copy Paper", 499, 500).alert_threshold(50);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
    pub alert_threshold: i64,
}

impl NewProduct {
    /// Creates a new product input with the default alert threshold.
    pub fn new(name: impl Into<String>, price_cents: i64, stock: i64) -> Self {
        NewProduct {
            name: name.into(),
            price_cents,
            stock,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }

    /// Sets the low-stock alert threshold.
    pub fn alert_threshold(mut self, threshold: i64) -> Self {
        self.alert_threshold = threshold;
        self
    }
}

// =============================================================================
// Product Repository
// =============================================================================

/// Repository for product catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let id = repo.insert(&NewProduct::new("Ballpoint Pen", 200, 50), false).await?;
/// let pen = repo.get_by_id(id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product and returns its generated id.
    ///
    /// ## Duplicate Names
    /// When a product with the same name exists and `force` is false,
    /// fails with [`CoreError::DuplicateName`]. The caller may re-invoke
    /// with `force = true` to add the duplicate anyway (the original
    /// till allows two distinct products to share a label).
    ///
    /// ## Errors
    /// - `Domain(Validation(..))` - empty name, price < 1 cent,
    ///   negative stock, threshold < 1
    /// - `Domain(DuplicateName)` - name taken and `force` is false
    pub async fn insert(&self, new: &NewProduct, force: bool) -> DbResult<i64> {
        validate_product_name(&new.name).map_err(CoreError::from)?;
        validate_price_cents(new.price_cents).map_err(CoreError::from)?;
        validate_stock(new.stock).map_err(CoreError::from)?;
        validate_alert_threshold(new.alert_threshold).map_err(CoreError::from)?;

        let name = new.name.trim();

        if !force && self.id_from_name(name).await?.is_some() {
            return Err(CoreError::DuplicateName(name.to_string()).into());
        }

        debug!(name = %name, price_cents = new.price_cents, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, price_cents, stock, alert_threshold)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(name)
        .bind(new.price_cents)
        .bind(new.stock)
        .bind(new.alert_threshold)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found (the not-found contract: callers
    ///   distinguish absence from failure without matching on errors)
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, stock, alert_threshold
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its name, resolving name → id first.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Product>> {
        match self.id_from_name(name).await? {
            Some(id) => self.get_by_id(id).await,
            None => Ok(None),
        }
    }

    /// Resolves a product name to its id.
    ///
    /// When duplicates were force-added, the lowest id wins (oldest
    /// product).
    pub async fn id_from_name(&self, name: &str) -> DbResult<Option<i64>> {
        let id: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM products WHERE name = ?1 ORDER BY id LIMIT 1
            "#,
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    /// Lists the whole catalog in id order.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, stock, alert_threshold
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Updates an existing product (name, price, stock, threshold).
    ///
    /// Writing back unchanged fields is a successful no-op.
    ///
    /// ## Errors
    /// - `NotFound` - id doesn't exist
    /// - `Domain(NameConflict)` - another product already owns the new name
    /// - `Domain(Validation(..))` - field out of range
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        validate_product_name(&product.name).map_err(CoreError::from)?;
        validate_price_cents(product.price_cents).map_err(CoreError::from)?;
        validate_stock(product.stock).map_err(CoreError::from)?;
        validate_alert_threshold(product.alert_threshold).map_err(CoreError::from)?;

        let name = product.name.trim();

        // The rename target must not belong to a different product
        let owner: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM products WHERE name = ?1 AND id <> ?2 ORDER BY id LIMIT 1
            "#,
        )
        .bind(name)
        .bind(product.id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(owner_id) = owner {
            return Err(CoreError::NameConflict {
                id: product.id,
                name: name.to_string(),
                owner_id,
            }
            .into());
        }

        debug!(id = product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?2, price_cents = ?3, stock = ?4, alert_threshold = ?5
            WHERE id = ?1
            "#,
        )
        .bind(product.id)
        .bind(name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.alert_threshold)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product.id));
        }

        Ok(())
    }

    /// Deletes a product by id.
    ///
    /// ## Referential Check
    /// A product that appears in any historical sale line item cannot be
    /// deleted; doing so would leave sale history joining against a
    /// missing row. Such deletes fail with [`CoreError::ProductInUse`].
    ///
    /// ## Errors
    /// - `NotFound` - zero rows affected
    /// - `Domain(ProductInUse)` - referenced by cart_items
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let reference_count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM cart_items WHERE product_id = ?1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if reference_count > 0 {
            return Err(CoreError::ProductInUse {
                id,
                reference_count,
            }
            .into());
        }

        debug!(id = id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product by name, resolving name → id first.
    pub async fn delete_by_name(&self, name: &str) -> DbResult<()> {
        match self.id_from_name(name).await? {
            Some(id) => self.delete(id).await,
            None => Err(DbError::not_found("Product", name)),
        }
    }

    /// Sets the low-stock alert threshold for a product.
    pub async fn set_alert_threshold(&self, id: i64, threshold: i64) -> DbResult<()> {
        validate_alert_threshold(threshold).map_err(CoreError::from)?;

        let result = sqlx::query(
            r#"
            UPDATE products SET alert_threshold = ?2 WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(threshold)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Sets the alert threshold by product name.
    pub async fn set_alert_threshold_by_name(&self, name: &str, threshold: i64) -> DbResult<()> {
        match self.id_from_name(name).await? {
            Some(id) => self.set_alert_threshold(id, threshold).await,
            None => Err(DbError::not_found("Product", name)),
        }
    }

    /// Reads a product's alert threshold.
    pub async fn alert_threshold(&self, id: i64) -> DbResult<Option<i64>> {
        let threshold: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT alert_threshold FROM products WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(threshold)
    }

    /// Overwrites a product's stock with an absolute value.
    ///
    /// This is an overwrite, not a delta: callers are responsible for
    /// computing the new absolute value from current stock ± change.
    /// See the module docs for the concurrency consequence.
    ///
    /// ## Errors
    /// - `Domain(Validation(..))` - negative stock
    /// - `NotFound` - id doesn't exist
    pub async fn set_stock(&self, id: i64, new_stock: i64) -> DbResult<()> {
        validate_stock(new_stock).map_err(CoreError::from)?;

        debug!(id = id, new_stock = new_stock, "Overwriting stock");

        let result = sqlx::query(
            r#"
            UPDATE products SET stock = ?2 WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(new_stock)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Overwrites stock by product name.
    pub async fn set_stock_by_name(&self, name: &str, new_stock: i64) -> DbResult<()> {
        match self.id_from_name(name).await? {
            Some(id) => self.set_stock(id, new_stock).await,
            None => Err(DbError::not_found("Product", name)),
        }
    }

    /// Counts catalog products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
