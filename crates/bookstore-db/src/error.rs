//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)          CoreError (bookstore-core)        │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ├── inside checkout: wrapped once as CheckoutAborted             │
//! │       ▼                                                                 │
//! │  Terminal prints the message and returns to its menu                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use thiserror::Error;

use bookstore_core::{BookId, CoreError};

/// Step of the checkout transaction that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    Begin,
    InsertOrder,
    ReadBook,
    UpdateStock,
    InsertLine,
    AuthorSales,
    GenreSales,
    PublisherBalance,
    Commit,
}

impl CheckoutStage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CheckoutStage::Begin => "begin",
            CheckoutStage::InsertOrder => "insert order",
            CheckoutStage::ReadBook => "read book",
            CheckoutStage::UpdateStock => "update stock",
            CheckoutStage::InsertLine => "insert order line",
            CheckoutStage::AuthorSales => "author sales",
            CheckoutStage::GenreSales => "genre sales",
            CheckoutStage::PublisherBalance => "publisher balance",
            CheckoutStage::Commit => "commit",
        }
    }
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - A referenced publisher or author doesn't exist
    ///
    /// Lookups by id return `Ok(None)` instead.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a genre name that already exists
    /// - Duplicate user id
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Book referencing a non-existent publisher
    /// - Linking a book to an unknown author or genre
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation.
    ///
    /// ## When This Occurs
    /// - Stock or sales driven below zero
    /// - Status outside the allowed set
    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// The checkout transaction failed and was rolled back.
    ///
    /// The basket is left as it was.
    #[error("Checkout aborted at {stage}{}: {reason}", book_suffix(.book_id))]
    CheckoutAborted {
        book_id: Option<BookId>,
        stage: CheckoutStage,
        reason: String,
    },

    /// Business rule failure from bookstore-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Configuration value could not be used.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

fn book_suffix(book_id: &Option<BookId>) -> String {
    match book_id {
        Some(id) => format!(" (book {id})"),
        None => String::new(),
    }
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Wraps any failure inside the checkout transaction.
    pub fn checkout_aborted(
        book_id: Option<BookId>,
        stage: CheckoutStage,
        reason: impl ToString,
    ) -> Self {
        DbError::CheckoutAborted {
            book_id,
            stage,
            reason: reason.to_string(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite reports constraints as:
                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                // "CHECK constraint failed: <expr>"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::ConstraintViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_aborted_message() {
        let err = DbError::checkout_aborted(Some(7), CheckoutStage::UpdateStock, "stock changed");
        assert_eq!(
            err.to_string(),
            "Checkout aborted at update stock (book 7): stock changed"
        );

        let err = DbError::checkout_aborted(None, CheckoutStage::Commit, "disk I/O error");
        assert_eq!(err.to_string(), "Checkout aborted at commit: disk I/O error");
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: DbError = CoreError::EmptyBasket.into();
        assert_eq!(err.to_string(), "Basket is empty");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
