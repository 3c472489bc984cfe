//! # Domain Types
//!
//! Core domain types used throughout Tillpoint.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────┐        │
//! │  │    Product     │  │  Transaction   │  │   ReturnItem   │        │
//! │  │  ────────────  │  │  ────────────  │  │  ────────────  │        │
//! │  │  id (i64)      │  │  transaction_id│  │  return_id     │        │
//! │  │  name (key)    │  │  items (snap)  │  │  transaction_id│        │
//! │  │  price_cents   │  │  create_time   │  │  product_id    │        │
//! │  │  stock         │  │  is_paid       │  │  quantity      │        │
//! │  │  alert_thresh  │  │  total_cents   │  │  reason        │        │
//! │  └────────────────┘  └────────────────┘  └────────────────┘        │
//! │                                                                     │
//! │  ┌────────────────┐                                                │
//! │  │    CartItem    │   Owned exclusively by one cart or, after      │
//! │  │  product snap  │   checkout, by one transaction (copied,        │
//! │  │  quantity      │   not shared).                                 │
//! │  │  returned_qty  │                                                │
//! │  │  subtotal      │                                                │
//! │  └────────────────┘                                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every persisted entity is keyed by a generated integer id (SQLite
//! AUTOINCREMENT). Product `name` is the human-facing business key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Generated identifier.
    pub id: i64,

    /// Display name. Business key: unique unless an operator force-adds
    /// a duplicate.
    pub name: String,

    /// Unit price in cents. Always >= 1 (one cent).
    pub price_cents: i64,

    /// Current stock level. Never negative.
    pub stock: i64,

    /// Stock level at or below which the product is flagged as low.
    /// Always >= 1.
    pub alert_threshold: i64,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether current stock is at or below the alert threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.alert_threshold
    }

    /// Checks whether `quantity` units can be sold from current stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line item: a product snapshot plus the purchased quantity.
///
/// In a live cart `returned_quantity` is always 0; once persisted under a
/// transaction, returns increment it up to `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product data at the moment the line was built.
    pub product: Product,

    /// Quantity purchased. Always > 0.
    pub quantity: i64,

    /// Quantity returned so far. Invariant: 0 <= returned_quantity <= quantity.
    pub returned_quantity: i64,

    /// Line subtotal in cents: product.price_cents * quantity.
    pub subtotal_cents: i64,
}

impl CartItem {
    /// Builds a line item from a product snapshot and a quantity.
    ///
    /// The subtotal is derived here and re-derived on every quantity
    /// change, keeping `subtotal_cents == price_cents * quantity`.
    pub fn new(product: Product, quantity: i64) -> Self {
        let subtotal_cents = product.price().multiply_quantity(quantity).cents();
        CartItem {
            product,
            quantity,
            returned_quantity: 0,
            subtotal_cents,
        }
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Units still eligible for return.
    #[inline]
    pub fn remaining_returnable(&self) -> i64 {
        self.quantity - self.returned_quantity
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A completed sale.
///
/// Created atomically with its line items at checkout; never deleted.
/// Immutable afterwards except `total_cents`, which the return processor
/// decreases when units come back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Generated identifier.
    pub transaction_id: i64,

    /// Cart snapshot at checkout time.
    ///
    /// Populated by checkout. History listings return headers with an
    /// empty items vector; fetch line items separately when needed.
    #[serde(default)]
    pub items: Vec<CartItem>,

    /// Checkout wall-clock time, epoch seconds.
    pub create_time: i64,

    /// Whether payment was taken. Checkout only persists paid sales.
    pub is_paid: bool,

    /// Current total in cents. Decreases as units are returned.
    pub total_cents: i64,

    /// Amount the customer handed over, in cents.
    pub amount_paid_cents: i64,

    /// Change returned to the customer, in cents.
    pub change_cents: i64,
}

impl Transaction {
    /// Returns the checkout time as a chrono timestamp.
    pub fn create_time(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.create_time, 0).unwrap_or_default()
    }

    /// Returns the current total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the amount paid as Money.
    #[inline]
    pub fn amount_paid(&self) -> Money {
        Money::from_cents(self.amount_paid_cents)
    }

    /// Returns the change as Money.
    #[inline]
    pub fn change(&self) -> Money {
        Money::from_cents(self.change_cents)
    }
}

// =============================================================================
// Return Item
// =============================================================================

/// An append-only record of a partial or full return against a
/// transaction's line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ReturnItem {
    /// Generated identifier.
    pub return_id: i64,

    /// Transaction the return applies to.
    pub transaction_id: i64,

    /// Product being returned.
    pub product_id: i64,

    /// Units returned in this record. Always > 0.
    pub quantity: i64,

    /// Free-text reason given by the customer.
    pub reason: Option<String>,

    /// Wall-clock time of the return, epoch seconds.
    pub return_time: i64,
}

impl ReturnItem {
    /// Returns the return time as a chrono timestamp.
    pub fn return_time(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.return_time, 0).unwrap_or_default()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pen() -> Product {
        Product {
            id: 1,
            name: "Pen".to_string(),
            price_cents: 200,
            stock: 10,
            alert_threshold: 5,
        }
    }

    #[test]
    fn test_cart_item_subtotal() {
        let item = CartItem::new(pen(), 3);
        assert_eq!(item.subtotal_cents, 600);
        assert_eq!(item.returned_quantity, 0);
        assert_eq!(item.remaining_returnable(), 3);
    }

    #[test]
    fn test_product_low_stock() {
        let mut p = pen();
        assert!(!p.is_low_stock()); // 10 > 5

        p.stock = 5;
        assert!(p.is_low_stock()); // boundary: stock == threshold

        p.stock = 4;
        assert!(p.is_low_stock());
    }

    #[test]
    fn test_product_can_sell() {
        let p = pen();
        assert!(p.can_sell(10));
        assert!(!p.can_sell(11));
    }

    #[test]
    fn test_transaction_timestamps() {
        let txn = Transaction {
            transaction_id: 1,
            items: Vec::new(),
            create_time: 1_700_000_000,
            is_paid: true,
            total_cents: 600,
            amount_paid_cents: 1000,
            change_cents: 400,
        };
        assert_eq!(txn.create_time().timestamp(), 1_700_000_000);
        assert_eq!(txn.change().cents(), 400);
    }

    /// The collaborator interface is JSON; headers deserialize without an
    /// items array.
    #[test]
    fn test_transaction_header_json() {
        let json = r#"{
            "transaction_id": 7,
            "create_time": 1700000000,
            "is_paid": true,
            "total_cents": 600,
            "amount_paid_cents": 1000,
            "change_cents": 400
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.transaction_id, 7);
        assert!(txn.items.is_empty());
    }
}
