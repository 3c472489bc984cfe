//! # Error Types
//!
//! Domain-specific error types for tillpoint-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  tillpoint-core errors (this file)                                  │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  tillpoint-db errors (separate crate)                               │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → DbError → caller               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (name, id, amounts)
//! 3. Errors are enum variants, never String
//! 4. Every expected business condition has a variant the caller can
//!    match on - nothing here is allowed to escape as a panic

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic
/// failures. They should be caught and translated to user-facing messages
/// by the presentation layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found by id or name.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Transaction cannot be found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(i64),

    /// The product was never part of the given transaction.
    #[error("Product {product_id} is not a line item of transaction {transaction_id}")]
    ProductNotInTransaction {
        transaction_id: i64,
        product_id: i64,
    },

    /// The product id is not currently in the cart.
    #[error("Product {0} is not in the cart")]
    ProductNotInCart(i64),

    /// A product with this name already exists.
    ///
    /// ## Non-fatal
    /// The caller may deliberately proceed anyway (force-add). The name
    /// is echoed back so the prompt can show it.
    #[error("A product named '{0}' already exists")]
    DuplicateName(String),

    /// Another product already owns the requested name on update.
    #[error("Cannot rename product {id}: '{name}' belongs to product {owner_id}")]
    NameConflict {
        id: i64,
        name: String,
        owner_id: i64,
    },

    /// The product is referenced by historical transactions and cannot
    /// be deleted without leaving dangling sale history.
    #[error("Product {id} is referenced by {reference_count} sale line item(s)")]
    ProductInUse { id: i64, reference_count: i64 },

    /// Insufficient stock to complete a checkout.
    ///
    /// ## Till Workflow
    /// ```text
    /// Checkout (Pen × 5)
    ///      │
    ///      ▼
    /// Guarded decrement: stock=3, requested=5
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Pen", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 Pen in stock" - nothing was written
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Checkout was asked to persist a cart with no line items.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Payment does not cover the cart total.
    #[error("Insufficient payment: total {required_cents} cents, paid {paid_cents} cents")]
    InsufficientPayment {
        required_cents: i64,
        paid_cents: i64,
    },

    /// Return quantity exceeds what is still returnable on the line item.
    #[error("Cannot return {requested}: only {remaining} unit(s) still returnable")]
    ExceedsReturnable { requested: i64, remaining: i64 },

    /// Cart has reached the maximum number of distinct products.
    #[error("Cart cannot hold more than {max} distinct products")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements. Used for
/// early rejection before any business logic or store mutation runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            name: "Pen".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Pen: available 3, requested 5"
        );

        let err = CoreError::ExceedsReturnable {
            requested: 4,
            remaining: 2,
        };
        assert_eq!(
            err.to_string(),
            "Cannot return 4: only 2 unit(s) still returnable"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
