//! # tillpoint-db: Database Layer for Tillpoint
//!
//! This crate provides database access for the Tillpoint engine.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Tillpoint Data Flow                           │
//! │                                                                     │
//! │  Presentation call (checkout, process_return, ...)                  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                  tillpoint-db (THIS CRATE)                    │ │
//! │  │                                                               │ │
//! │  │   ┌─────────────┐   ┌───────────────┐   ┌──────────────┐    │ │
//! │  │   │  Database   │   │ Repositories  │   │  Migrations  │    │ │
//! │  │   │  (pool.rs)  │   │ product.rs    │   │  (embedded)  │    │ │
//! │  │   │             │   │ ledger.rs     │   │              │    │ │
//! │  │   │ SqlitePool  │◄──│ returns.rs    │   │ 001_init.sql │    │ │
//! │  │   │ Management  │   │ stock.rs      │   │              │    │ │
//! │  │   └─────────────┘   └───────────────┘   └──────────────┘    │ │
//! │  │                                                               │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (or :memory: in tests)                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (catalog, ledger, returns,
//!   stock monitor)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tillpoint_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("till.db")).await?;
//!
//! let id = db.products().insert(
//!     &NewProduct::new("Ballpoint Pen", 200, 10),
//!     false,
//! ).await?;
//!
//! let txn = db.ledger().checkout(&cart, 1000).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::ledger::LedgerRepository;
pub use repository::product::{NewProduct, ProductRepository};
pub use repository::returns::ReturnRepository;
pub use repository::stock::StockMonitor;
