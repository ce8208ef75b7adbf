//! # Error Types
//!
//! Domain-specific error types for bookstore-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bookstore-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  bookstore-db errors (separate crate)                                  │
//! │  └── DbError          - Database and checkout failures                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → terminal message        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Clamping a basket line to the available stock is NOT an error; see
//! [`crate::checkout::ClampNotice`].

use thiserror::Error;

use crate::types::{BookId, OrderNumber};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout was requested with nothing in the basket.
    ///
    /// Raised before any storage is touched.
    #[error("Basket is empty")]
    EmptyBasket,

    /// Book cannot be found.
    #[error("Book not found: {0}")]
    BookNotFound(BookId),

    /// Order cannot be found.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderNumber),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// The terminals re-prompt on these; they never reach the core operations.
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

    /// Invalid format (e.g., non-numeric quantity).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Lower bound of a range exceeds its upper bound.
    #[error("{field} minimum {min} exceeds maximum {max}")]
    InvertedRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
