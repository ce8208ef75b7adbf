//! # bookstore-db: Database Layer for the Bookstore
//!
//! SQLite storage for the catalog, orders, publishers and reports, with the
//! checkout transaction that ties them together.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bookstore Data Flow                              │
//! │                                                                         │
//! │  Customer / owner terminal                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  bookstore-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │   │   │
//! │  │   │               │    │ Catalog       │    │              │   │   │
//! │  │   │ SqlitePool    │◄───│ Search        │    │ 001_initial  │   │   │
//! │  │   │ StoreConfig   │    │ Order         │    │ _schema.sql  │   │   │
//! │  │   │               │    │ Publisher     │    │              │   │   │
//! │  │   │               │    │ Report, User  │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │            ▲                                                    │   │
//! │  │            └──── OrderCommitter (checkout.rs, one transaction)  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                SQLite Database (./bookstore.db)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation, configuration and embedded migrations
//! - [`config`] - Environment-driven store settings
//! - [`error`] - Database error types
//! - [`repository`] - Catalog, search, order, publisher, report and user access
//! - [`checkout`] - The order committer
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bookstore_db::{Database, StoreConfig};
//! use bookstore_core::{Basket, SearchCriteria};
//!
//! let config = StoreConfig::from_env()?;
//! let db = Database::new(config.db_config()).await?;
//!
//! let hits = db.search().search(&SearchCriteria::new().title("beagle")).await?;
//!
//! let mut basket = Basket::new();
//! basket.add(7, 2);
//! let receipt = db
//!     .committer(config.order_status)
//!     .commit(&mut basket, "billing", "shipping")
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod config;
pub mod error;
pub mod pool;
pub mod repository;

#[cfg(test)]
pub(crate) mod test_utils;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{CheckoutReceipt, OrderCommitter};
pub use config::StoreConfig;
pub use error::{CheckoutStage, DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::order::OrderRepository;
pub use repository::publisher::PublisherRepository;
pub use repository::report::ReportRepository;
pub use repository::search::SearchRepository;
pub use repository::user::UserRepository;
