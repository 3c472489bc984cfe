//! # Return Repository
//!
//! Records partial or full returns against a transaction's line items.
//!
//! ## Return Processing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │               process_return, One SQL Transaction                   │
//! │                                                                     │
//! │  BEGIN                                                              │
//! │    │                                                                │
//! │    ├── 1. transaction exists?        → else TransactionNotFound     │
//! │    ├── 2. product on a line item?    → else ProductNotInTransaction │
//! │    ├── 3. qty <= remaining?          → else ExceedsReturnable       │
//! │    │                                                                │
//! │    ├── 4a. INSERT INTO returns (audit record)                       │
//! │    ├── 4b. UPDATE cart_items SET returned_quantity += qty           │
//! │    ├── 4c. UPDATE products   SET stock += qty                       │
//! │    └── 4d. UPDATE transactions SET total_cents -= price × qty       │
//! │    │                                                                │
//! │  COMMIT ← 4a-4d all applied, or none (rollback on any failure)      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Refund Price
//! Step 4d prices the refund at the product's *current* catalog price,
//! not the price paid at sale time. Price drift between sale and return
//! therefore changes refund amounts. This mirrors the till's historical
//! behavior and is kept as-is.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use tillpoint_core::validation::{validate_quantity, validate_return_reason};
use tillpoint_core::{CoreError, ReturnItem};

/// Repository for return processing and audit views.
#[derive(Debug, Clone)]
pub struct ReturnRepository {
    pool: SqlitePool,
}

impl ReturnRepository {
    /// Creates a new ReturnRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReturnRepository { pool }
    }

    /// Processes a return of `quantity` units of `product_id` against
    /// `transaction_id`.
    ///
    /// Returning exactly the remaining returnable quantity is allowed
    /// (the line item becomes fully returned). Zero or negative
    /// quantities are rejected by validation before anything runs.
    ///
    /// ## Errors
    /// - `Domain(Validation(..))` - non-positive quantity, oversized reason
    /// - `Domain(TransactionNotFound)`
    /// - `Domain(ProductNotInTransaction)`
    /// - `Domain(ExceedsReturnable)` - requested more than remains;
    ///   state is left untouched
    pub async fn process_return(
        &self,
        transaction_id: i64,
        product_id: i64,
        quantity: i64,
        reason: Option<&str>,
    ) -> DbResult<ReturnItem> {
        validate_quantity(quantity).map_err(CoreError::from)?;
        if let Some(reason) = reason {
            validate_return_reason(reason).map_err(CoreError::from)?;
        }

        debug!(
            transaction_id = transaction_id,
            product_id = product_id,
            quantity = quantity,
            "Processing return"
        );

        // All reads and writes share one transaction so the remaining-
        // returnable check and the mutations see a single snapshot.
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar(
            "SELECT transaction_id FROM transactions WHERE transaction_id = ?1",
        )
        .bind(transaction_id)
        .fetch_optional(&mut *tx)
        .await?;

        if exists.is_none() {
            return Err(CoreError::TransactionNotFound(transaction_id).into());
        }

        let line: Option<(i64, i64, i64)> = sqlx::query_as(
            r#"
            SELECT item_id, quantity, returned_quantity
            FROM cart_items
            WHERE transaction_id = ?1 AND product_id = ?2
            "#,
        )
        .bind(transaction_id)
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (item_id, sold_quantity, returned_quantity) = match line {
            Some(line) => line,
            None => {
                return Err(CoreError::ProductNotInTransaction {
                    transaction_id,
                    product_id,
                }
                .into())
            }
        };

        let remaining = sold_quantity - returned_quantity;
        if quantity > remaining {
            return Err(CoreError::ExceedsReturnable {
                requested: quantity,
                remaining,
            }
            .into());
        }

        // Current catalog price; see module docs on refund pricing
        let price_cents: Option<i64> =
            sqlx::query_scalar("SELECT price_cents FROM products WHERE id = ?1")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?;

        let price_cents = match price_cents {
            Some(price) => price,
            None => return Err(CoreError::ProductNotFound(product_id.to_string()).into()),
        };

        let refund_cents = price_cents * quantity;
        let return_time = Utc::now().timestamp();

        let inserted = sqlx::query(
            r#"
            INSERT INTO returns (transaction_id, product_id, quantity, reason, return_time)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(transaction_id)
        .bind(product_id)
        .bind(quantity)
        .bind(reason)
        .bind(return_time)
        .execute(&mut *tx)
        .await?;

        let return_id = inserted.last_insert_rowid();

        sqlx::query(
            r#"
            UPDATE cart_items
            SET returned_quantity = returned_quantity + ?2
            WHERE item_id = ?1
            "#,
        )
        .bind(item_id)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE products SET stock = stock + ?2 WHERE id = ?1")
            .bind(product_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE transactions
            SET total_cents = total_cents - ?2
            WHERE transaction_id = ?1
            "#,
        )
        .bind(transaction_id)
        .bind(refund_cents)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            return_id = return_id,
            transaction_id = transaction_id,
            product_id = product_id,
            quantity = quantity,
            refund_cents = refund_cents,
            "Return committed"
        );

        Ok(ReturnItem {
            return_id,
            transaction_id,
            product_id,
            quantity,
            reason: reason.map(str::to_string),
            return_time,
        })
    }

    /// Gets all return records, newest first.
    pub async fn get_all(&self) -> DbResult<Vec<ReturnItem>> {
        let returns = sqlx::query_as::<_, ReturnItem>(
            r#"
            SELECT return_id, transaction_id, product_id, quantity, reason, return_time
            FROM returns
            ORDER BY return_time DESC, return_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(returns)
    }

    /// Gets the returns recorded against one transaction, newest first.
    pub async fn get_by_transaction(&self, transaction_id: i64) -> DbResult<Vec<ReturnItem>> {
        let returns = sqlx::query_as::<_, ReturnItem>(
            r#"
            SELECT return_id, transaction_id, product_id, quantity, reason, return_time
            FROM returns
            WHERE transaction_id = ?1
            ORDER BY return_time DESC, return_id DESC
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(returns)
    }

    /// Gets the returns recorded for one product, newest first.
    pub async fn get_by_product(&self, product_id: i64) -> DbResult<Vec<ReturnItem>> {
        let returns = sqlx::query_as::<_, ReturnItem>(
            r#"
            SELECT return_id, transaction_id, product_id, quantity, reason, return_time
            FROM returns
            WHERE product_id = ?1
            ORDER BY return_time DESC, return_id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(returns)
    }
}
