//! # Shopping Cart
//!
//! The in-memory, process-local cart aggregate. Nothing here touches the
//! database; the cart only maintains arithmetic consistency between its
//! line items and its running total.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Cart Operations                                │
//! │                                                                     │
//! │  UI Action               Cart Operation          State Change       │
//! │  ─────────               ──────────────          ────────────       │
//! │  Click Product ────────► add_or_increment() ───► qty += n           │
//! │  Change Quantity ──────► set_quantity() ───────► qty = n            │
//! │  Click Remove ─────────► remove() ─────────────► items.remove(i)    │
//! │  Checkout / Reset ─────► clear() ──────────────► items.clear()      │
//! │                                                                     │
//! │  After EVERY mutation: total_cents == Σ items.subtotal_cents        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What the cart does NOT do
//! Stock validation. Whether the requested quantity is actually on the
//! shelf is the business flow's concern before mutating the cart; the
//! guarded stock decrement at checkout is the final arbiter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{CartItem, Product};
use crate::MAX_CART_ITEMS;

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by product id (adding the same product increments)
/// - Every item quantity is > 0 (setting 0 removes the line)
/// - `total_cents` equals the sum of line subtotals after every mutation
/// - At most [`MAX_CART_ITEMS`] distinct products
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingCart {
    /// Line items, in insertion order.
    items: Vec<CartItem>,

    /// Running total in cents, maintained on every mutation.
    total_cents: i64,

    /// When the cart was created or last cleared.
    created_at: DateTime<Utc>,
}

impl Default for ShoppingCart {
    fn default() -> Self {
        ShoppingCart::new()
    }
}

impl ShoppingCart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        ShoppingCart {
            items: Vec::new(),
            total_cents: 0,
            created_at: Utc::now(),
        }
    }

    /// Adds a product to the cart, or increments its quantity if the
    /// product is already present.
    ///
    /// The product data is snapshotted into the line item; later catalog
    /// edits do not touch lines already in the cart.
    ///
    /// ## Errors
    /// - [`CoreError::CartTooLarge`] when a new line would exceed the
    ///   distinct-product cap
    pub fn add_or_increment(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity += quantity;
            let new_subtotal = item.product.price().multiply_quantity(item.quantity).cents();
            self.total_cents += new_subtotal - item.subtotal_cents;
            item.subtotal_cents = new_subtotal;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        let item = CartItem::new(product.clone(), quantity);
        self.total_cents += item.subtotal_cents;
        self.items.push(item);
        Ok(())
    }

    /// Replaces a line's quantity wholesale (not an increment).
    ///
    /// Setting quantity to 0 removes the line.
    ///
    /// ## Errors
    /// - [`CoreError::ProductNotInCart`] when the product has no line
    pub fn set_quantity(&mut self, product_id: i64, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove(product_id);
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.product.id == product_id)
            .ok_or(CoreError::ProductNotInCart(product_id))?;

        item.quantity = quantity;
        let new_subtotal = item.product.price().multiply_quantity(quantity).cents();
        self.total_cents += new_subtotal - item.subtotal_cents;
        item.subtotal_cents = new_subtotal;
        Ok(())
    }

    /// Removes a line by product id, subtracting its subtotal from the
    /// total.
    ///
    /// ## Errors
    /// - [`CoreError::ProductNotInCart`] when the product has no line
    pub fn remove(&mut self, product_id: i64) -> CoreResult<()> {
        let pos = self
            .items
            .iter()
            .position(|i| i.product.id == product_id)
            .ok_or(CoreError::ProductNotInCart(product_id))?;

        let item = self.items.remove(pos);
        self.total_cents -= item.subtotal_cents;
        Ok(())
    }

    /// Empties the cart and zeroes the total.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total_cents = 0;
        self.created_at = Utc::now();
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The running total in cents.
    #[inline]
    pub fn total_cents(&self) -> i64 {
        self.total_cents
    }

    /// Number of distinct products in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// When the cart was created or last cleared.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, price_cents: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            price_cents,
            stock: 100,
            alert_threshold: 10,
        }
    }

    /// The cart invariant, checked directly rather than trusted.
    fn assert_total_consistent(cart: &ShoppingCart) {
        let sum: i64 = cart.items().iter().map(|i| i.subtotal_cents).sum();
        assert_eq!(cart.total_cents(), sum);
    }

    #[test]
    fn test_add_new_items() {
        let mut cart = ShoppingCart::new();
        cart.add_or_increment(&product(1, "Pen", 200), 3).unwrap();
        cart.add_or_increment(&product(2, "Notebook", 550), 1).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_cents(), 3 * 200 + 550);
        assert_total_consistent(&cart);
    }

    #[test]
    fn test_add_increments_existing_line() {
        let mut cart = ShoppingCart::new();
        let pen = product(1, "Pen", 200);

        cart.add_or_increment(&pen, 2).unwrap();
        cart.add_or_increment(&pen, 3).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.items()[0].subtotal_cents, 1000);
        assert_total_consistent(&cart);
    }

    #[test]
    fn test_set_quantity_replaces() {
        let mut cart = ShoppingCart::new();
        cart.add_or_increment(&product(1, "Pen", 200), 5).unwrap();

        cart.set_quantity(1, 2).unwrap();
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.total_cents(), 400);
        assert_total_consistent(&cart);

        // Setting zero removes the line
        cart.set_quantity(1, 0).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total_cents(), 0);
    }

    #[test]
    fn test_set_quantity_unknown_product() {
        let mut cart = ShoppingCart::new();
        let err = cart.set_quantity(42, 3).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotInCart(42)));
    }

    #[test]
    fn test_remove_subtracts_subtotal() {
        let mut cart = ShoppingCart::new();
        cart.add_or_increment(&product(1, "Pen", 200), 3).unwrap();
        cart.add_or_increment(&product(2, "Notebook", 550), 2).unwrap();

        cart.remove(1).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_cents(), 1100);
        assert_total_consistent(&cart);

        assert!(matches!(
            cart.remove(1),
            Err(CoreError::ProductNotInCart(1))
        ));
    }

    #[test]
    fn test_clear() {
        let mut cart = ShoppingCart::new();
        cart.add_or_increment(&product(1, "Pen", 200), 3).unwrap();

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_cents(), 0);
    }

    #[test]
    fn test_cart_size_cap() {
        let mut cart = ShoppingCart::new();
        for id in 0..MAX_CART_ITEMS as i64 {
            cart.add_or_increment(&product(id, &format!("P{id}"), 100), 1)
                .unwrap();
        }

        let err = cart
            .add_or_increment(&product(999, "Overflow", 100), 1)
            .unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { .. }));

        // Incrementing an existing line still works at the cap
        cart.add_or_increment(&product(0, "P0", 100), 1).unwrap();
    }

    /// Mixed mutation sequence keeps the running total consistent with
    /// the recomputed sum at every step.
    #[test]
    fn test_total_consistency_through_mutations() {
        let mut cart = ShoppingCart::new();
        let pen = product(1, "Pen", 199);
        let pad = product(2, "Notepad", 1250);
        let clip = product(3, "Paperclips", 85);

        cart.add_or_increment(&pen, 4).unwrap();
        assert_total_consistent(&cart);
        cart.add_or_increment(&pad, 1).unwrap();
        assert_total_consistent(&cart);
        cart.set_quantity(1, 2).unwrap();
        assert_total_consistent(&cart);
        cart.add_or_increment(&clip, 10).unwrap();
        assert_total_consistent(&cart);
        cart.remove(2).unwrap();
        assert_total_consistent(&cart);
        cart.set_quantity(3, 7).unwrap();
        assert_total_consistent(&cart);

        assert_eq!(cart.total_cents(), 2 * 199 + 7 * 85);
    }

    #[test]
    fn test_snapshot_isolated_from_catalog_edits() {
        let mut cart = ShoppingCart::new();
        let mut pen = product(1, "Pen", 200);
        cart.add_or_increment(&pen, 3).unwrap();

        // A later price change in the catalog does not reach the cart line
        pen.price_cents = 999;
        assert_eq!(cart.items()[0].product.price_cents, 200);
        assert_eq!(cart.total_cents(), 600);
    }
}
