//! # tillpoint-core: Pure Business Logic for Tillpoint
//!
//! This crate is the **heart** of Tillpoint. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Tillpoint Architecture                         │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │              Presentation (out of scope)                      │ │
//! │  │   Catalog UI ──► Cart UI ──► Settlement UI ──► History UI     │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │             ★ tillpoint-core (THIS CRATE) ★                   │ │
//! │  │                                                               │ │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌────────────┐     │ │
//! │  │   │  types  │  │  money  │  │  cart   │  │ validation │     │ │
//! │  │   │ Product │  │  Money  │  │  Cart   │  │   rules    │     │ │
//! │  │   │ Txn     │  │  cents  │  │  math   │  │   checks   │     │ │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └────────────┘     │ │
//! │  │                                                               │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │                 tillpoint-db (Database Layer)                 │ │
//! │  │        SQLite queries, migrations, repositories               │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, CartItem, Transaction, ReturnItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - In-memory shopping cart aggregate
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tillpoint_core::Money` instead of
// `use tillpoint_core::money::Money`

pub use cart::ShoppingCart;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct products allowed in a single cart.
///
/// ## Business Reason
/// A till transaction is bounded; this prevents runaway carts.
pub const MAX_CART_ITEMS: usize = 20;

/// Maximum quantity of a single item in cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Default low-stock alert threshold for new products.
pub const DEFAULT_ALERT_THRESHOLD: i64 = 10;
