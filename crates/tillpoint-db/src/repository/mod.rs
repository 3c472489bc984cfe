//! # Repository Module
//!
//! Database repository implementations for Tillpoint.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                     │
//! │                                                                     │
//! │  The Repository pattern abstracts database access behind a clean   │
//! │  API that takes and returns tillpoint-core domain types.           │
//! │                                                                     │
//! │  Business flow                                                      │
//! │       │                                                             │
//! │       │  db.ledger().checkout(&cart, amount_paid)                   │
//! │       ▼                                                             │
//! │  LedgerRepository                                                   │
//! │  ├── checkout(&self, cart, amount_paid_cents)                       │
//! │  ├── get_all(&self)                                                 │
//! │  └── line_items(&self, transaction_id)                              │
//! │       │                                                             │
//! │       │  parameterized SQL, one transaction per mutation            │
//! │       ▼                                                             │
//! │  SQLite Database                                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product catalog CRUD and stock
//! - [`ledger::LedgerRepository`] - Checkout and sale history
//! - [`returns::ReturnRepository`] - Return processing and audit views
//! - [`stock::StockMonitor`] - Low-stock derivation

pub mod ledger;
pub mod product;
pub mod returns;
pub mod stock;
