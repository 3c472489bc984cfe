//! # Stock Monitor
//!
//! Read-side derivation of low-stock alerts.
//!
//! A product is "low" when `stock <= alert_threshold`. The monitor
//! evaluates this live against the catalog on every call - no caching,
//! no snapshotting - so two calls with no intervening mutation return
//! identical results. It triggers no mutation itself; the surrounding
//! UI queries it after anything that can reduce stock (checkout) or on
//! explicit refresh.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use tillpoint_core::Product;

/// Read-only monitor over the product catalog.
#[derive(Debug, Clone)]
pub struct StockMonitor {
    pool: SqlitePool,
}

impl StockMonitor {
    /// Creates a new StockMonitor.
    pub fn new(pool: SqlitePool) -> Self {
        StockMonitor { pool }
    }

    /// Lists products whose stock is at or below their alert threshold.
    pub async fn low_stock_products(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, stock, alert_threshold
            FROM products
            WHERE stock <= alert_threshold
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Low stock products");
        Ok(products)
    }

    /// Counts low-stock products without materializing them.
    ///
    /// For badge-style indicators in the surrounding UI.
    pub async fn low_stock_count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE stock <= alert_threshold",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
