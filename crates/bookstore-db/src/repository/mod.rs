//! # Repository Module
//!
//! Database repository implementations for the bookstore.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Terminal menu action                                                  │
//! │       │                                                                 │
//! │       │  db.catalog().get_book(7)                                      │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  CatalogRepository                                                     │
//! │  ├── get_book(&self, id)                                               │
//! │  ├── list_books(&self, filter)                                         │
//! │  ├── insert_book(&self, new_book)                                      │
//! │  └── remove_book(&self, id)                                            │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  The order write path is not a repository: see crate::checkout.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`](catalog::CatalogRepository) - Books, authors, genres
//! - [`SearchRepository`](search::SearchRepository) - Staged search with fuzzy fallback
//! - [`OrderRepository`](order::OrderRepository) - Order tracking
//! - [`PublisherRepository`](publisher::PublisherRepository) - Publisher listing and registration
//! - [`ReportRepository`](report::ReportRepository) - Sales and profit reports
//! - [`UserRepository`](user::UserRepository) - Login

use sqlx::{QueryBuilder, Sqlite};

use bookstore_core::BookId;

pub mod catalog;
pub mod order;
pub mod publisher;
pub mod report;
pub mod search;
pub mod user;

/// Most ids bound into one `IN (...)` list. SQLite caps a statement at
/// 32766 variables, so longer lists are split into chunks of this size.
pub(crate) const MAX_BOUND_IDS: usize = 10_000;

/// Appends `(?, ?, ...)` binding every id.
///
/// Callers must not pass an empty slice or more than [`MAX_BOUND_IDS`] ids.
pub(crate) fn push_id_list(qb: &mut QueryBuilder<'_, Sqlite>, ids: &[BookId]) {
    debug_assert!(!ids.is_empty() && ids.len() <= MAX_BOUND_IDS);

    qb.push("(");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

/// Optional case-insensitive name filter shared by the list and report queries.
pub(crate) fn push_name_filter(
    qb: &mut QueryBuilder<'_, Sqlite>,
    column: &str,
    filter: Option<&str>,
) {
    if let Some(text) = filter.map(str::trim).filter(|t| !t.is_empty()) {
        qb.push(" WHERE ")
            .push(column)
            .push(" LIKE ")
            .push_bind(bookstore_core::search::like_pattern(text))
            .push(" ESCAPE '\\'");
    }
}
