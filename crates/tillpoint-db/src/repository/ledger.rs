//! # Transaction Ledger Repository
//!
//! Checkout and sale history.
//!
//! ## Checkout Atomicity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Checkout, One SQL Transaction                    │
//! │                                                                     │
//! │  BEGIN                                                              │
//! │    │                                                                │
//! │    ├── INSERT INTO transactions (header, is_paid = 1)               │
//! │    │        │                                                       │
//! │    │        └── last_insert_rowid() → transaction_id                │
//! │    │                                                                │
//! │    ├── for each cart line:                                          │
//! │    │     INSERT INTO cart_items (snapshot of the line)              │
//! │    │     UPDATE products SET stock = stock - qty                    │
//! │    │            WHERE id = ? AND stock >= qty  ← guarded            │
//! │    │               │                                                │
//! │    │               └── 0 rows? → InsufficientStock → ROLLBACK       │
//! │    │                                                                │
//! │  COMMIT ← all rows written and all stock decremented, or nothing    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The guarded decrement is also what keeps `stock >= 0` true under a
//! second till instance sharing the file: the WHERE clause re-reads
//! stock inside the transaction, so an overdraft fails cleanly instead
//! of going negative.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use tillpoint_core::validation::validate_payment_cents;
use tillpoint_core::{CartItem, CoreError, Product, ShoppingCart, Transaction};

// =============================================================================
// Row Types
// =============================================================================

/// Flat transactions row; `items` is attached separately.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    transaction_id: i64,
    create_time: i64,
    is_paid: bool,
    total_cents: i64,
    amount_paid_cents: i64,
    change_cents: i64,
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Transaction {
            transaction_id: row.transaction_id,
            items: Vec::new(),
            create_time: row.create_time,
            is_paid: row.is_paid,
            total_cents: row.total_cents,
            amount_paid_cents: row.amount_paid_cents,
            change_cents: row.change_cents,
        }
    }
}

/// cart_items row joined with the current products row.
#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    quantity: i64,
    returned_quantity: i64,
    subtotal_cents: i64,
    id: i64,
    name: String,
    price_cents: i64,
    stock: i64,
    alert_threshold: i64,
}

impl From<LineItemRow> for CartItem {
    fn from(row: LineItemRow) -> Self {
        CartItem {
            product: Product {
                id: row.id,
                name: row.name,
                price_cents: row.price_cents,
                stock: row.stock,
                alert_threshold: row.alert_threshold,
            },
            quantity: row.quantity,
            returned_quantity: row.returned_quantity,
            subtotal_cents: row.subtotal_cents,
        }
    }
}

// =============================================================================
// Ledger Repository
// =============================================================================

/// Repository for the durable sale ledger.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Converts a cart into a persisted, paid transaction.
    ///
    /// ## Behavior
    /// - `change = amount_paid - cart.total`; the caller (settlement UI)
    ///   checks coverage first, and this re-validates anyway
    /// - Persists the header and one line item per cart line, and
    ///   decrements each product's stock, as a single atomic unit
    /// - On success the cart should be cleared by the caller
    ///
    /// ## Errors
    /// - `Domain(EmptyCart)` - no line items
    /// - `Domain(Validation(..))` - non-positive payment
    /// - `Domain(InsufficientPayment)` - payment below cart total
    /// - `Domain(InsufficientStock)` - a line exceeds current stock;
    ///   nothing is written
    /// - `Domain(ProductNotFound)` - a cart line references a product
    ///   that has since vanished; nothing is written
    pub async fn checkout(
        &self,
        cart: &ShoppingCart,
        amount_paid_cents: i64,
    ) -> DbResult<Transaction> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        validate_payment_cents(amount_paid_cents).map_err(CoreError::from)?;

        let total_cents = cart.total_cents();
        if amount_paid_cents < total_cents {
            return Err(CoreError::InsufficientPayment {
                required_cents: total_cents,
                paid_cents: amount_paid_cents,
            }
            .into());
        }

        let change_cents = amount_paid_cents - total_cents;
        let create_time = Utc::now().timestamp();

        debug!(
            total_cents = total_cents,
            lines = cart.item_count(),
            "Beginning checkout"
        );

        // Everything below either commits together or rolls back
        // together (dropping the tx on the error path rolls back).
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO transactions
                (create_time, is_paid, total_cents, amount_paid_cents, change_cents)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(create_time)
        .bind(true)
        .bind(total_cents)
        .bind(amount_paid_cents)
        .bind(change_cents)
        .execute(&mut *tx)
        .await?;

        let transaction_id = result.last_insert_rowid();

        for item in cart.items() {
            sqlx::query(
                r#"
                INSERT INTO cart_items
                    (transaction_id, product_id, quantity, returned_quantity, subtotal_cents)
                VALUES (?1, ?2, ?3, 0, ?4)
                "#,
            )
            .bind(transaction_id)
            .bind(item.product.id)
            .bind(item.quantity)
            .bind(item.subtotal_cents)
            .execute(&mut *tx)
            .await?;

            // Guarded decrement: refuses to take stock below zero
            let updated = sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - ?2
                WHERE id = ?1 AND stock >= ?2
                "#,
            )
            .bind(item.product.id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                // Distinguish "not enough stock" from "product gone"
                let current: Option<(String, i64)> =
                    sqlx::query_as("SELECT name, stock FROM products WHERE id = ?1")
                        .bind(item.product.id)
                        .fetch_optional(&mut *tx)
                        .await?;

                return Err(match current {
                    Some((name, available)) => CoreError::InsufficientStock {
                        name,
                        available,
                        requested: item.quantity,
                    }
                    .into(),
                    None => CoreError::ProductNotFound(item.product.id.to_string()).into(),
                });
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            transaction_id = transaction_id,
            total_cents = total_cents,
            change_cents = change_cents,
            "Checkout committed"
        );

        Ok(Transaction {
            transaction_id,
            items: cart.items().to_vec(),
            create_time,
            is_paid: true,
            total_cents,
            amount_paid_cents,
            change_cents,
        })
    }

    /// Gets all transactions, newest first by create_time.
    ///
    /// Returns headers only: `items` is empty. Use [`Self::line_items`]
    /// for a transaction's lines.
    pub async fn get_all(&self) -> DbResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT transaction_id, create_time, is_paid,
                   total_cents, amount_paid_cents, change_cents
            FROM transactions
            ORDER BY create_time DESC, transaction_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    /// Gets a transaction header by id.
    pub async fn get_by_id(&self, transaction_id: i64) -> DbResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT transaction_id, create_time, is_paid,
                   total_cents, amount_paid_cents, change_cents
            FROM transactions
            WHERE transaction_id = ?1
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Transaction::from))
    }

    /// Gets a transaction's line items, joined with the current product
    /// rows.
    ///
    /// ## Fidelity Note
    /// The product name and price reflect the catalog *now*, not at sale
    /// time. Quantity, returned_quantity and the line subtotal are the
    /// sale-time values.
    pub async fn line_items(&self, transaction_id: i64) -> DbResult<Vec<CartItem>> {
        let rows = sqlx::query_as::<_, LineItemRow>(
            r#"
            SELECT ci.quantity, ci.returned_quantity, ci.subtotal_cents,
                   p.id, p.name, p.price_cents, p.stock, p.alert_threshold
            FROM cart_items ci
            JOIN products p ON ci.product_id = p.id
            WHERE ci.transaction_id = ?1
            ORDER BY ci.item_id
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CartItem::from).collect())
    }
}
