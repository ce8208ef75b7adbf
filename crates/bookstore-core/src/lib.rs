//! # bookstore-core: Pure Domain Logic for the Bookstore
//!
//! Everything the bookstore decides without touching storage: money and
//! revenue-share arithmetic, the session basket, per-line checkout clamping,
//! order-status policy, search criteria and fuzzy title matching.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bookstore Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Owner / Customer terminals (external)              │   │
//! │  │    Browse ──► Search ──► Basket ──► Checkout ──► Track Orders  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ bookstore-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  basket   │  │  search   │  │   │
//! │  │   │   Book    │  │   Money   │  │  Basket   │  │ Criteria  │  │   │
//! │  │   │   Order   │  │ ShareRate │  │           │  │  fuzzy    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │ checkout  │  │validation │                                 │   │
//! │  │   │ LinePlan  │  │  parsers  │                                 │   │
//! │  │   │  policy   │  │           │                                 │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  bookstore-db (Database Layer)                  │   │
//! │  │     SQLite queries, migrations, repositories, order commit      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Book, Order, PublisherInfo, ...)
//! - [`money`] - Integer-cent money and revenue shares
//! - [`basket`] - The session's pending selections
//! - [`checkout`] - Per-line clamp plan, clamp notices, status policy
//! - [`search`] - Search criteria, LIKE escaping, edit distance
//! - [`validation`] - Terminal input parsers
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use bookstore_core::checkout::LinePlan;
//! use bookstore_core::money::Money;
//! use bookstore_core::types::ShareRate;
//!
//! // 8 copies requested, 5 on hand, $20.00 at 30% to the publisher
//! let plan = LinePlan::new(8, 5);
//! let credit = plan.publisher_credit(Money::from_cents(2000), ShareRate::from_bps(3000));
//!
//! assert_eq!(plan.sold, 5);
//! assert_eq!(credit.to_string(), "$30.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod basket;
pub mod checkout;
pub mod error;
pub mod money;
pub mod search;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use basket::{Basket, BasketEntry};
pub use checkout::{ClampNotice, LinePlan, StatusPolicy};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use search::{SearchCriteria, SearchOutcome};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest Levenshtein distance at which a title is still suggested.
pub const FUZZY_TITLE_MAX_DISTANCE: usize = 16;

/// First order number handed out by a fresh store.
pub const FIRST_ORDER_NUMBER: OrderNumber = 10_000;

/// Largest quantity the terminals accept in one "add to basket".
pub const MAX_BASKET_QUANTITY: i64 = 999;

/// Widest title the catalog listing can show.
pub const MAX_TITLE_LEN: usize = 30;
