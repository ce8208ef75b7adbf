//! # Checkout Planning
//!
//! The pure half of checkout: how many copies of each basket line can be
//! sold, what the stock becomes, what the publisher is owed, and which status
//! a new order starts in. The database half lives in `bookstore-db`.
//!
//! ## Per-Line Plan
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        LinePlan::new(requested, stock)                  │
//! │                                                                         │
//! │   requested ──► max(requested, 0) ──► min(_, stock) ──► sold            │
//! │                                                                         │
//! │   new_stock = stock - sold            (never negative)                  │
//! │   clamped   = requested > stock       (ClampNotice, not an error)       │
//! │   credit    = (price × sold).share(publisher rate)                      │
//! │                                                                         │
//! │   Example: stock 5, requested 8, $20.00 at 30%                          │
//! │     sold 5, new_stock 0, clamped, credit $30.00                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{BookId, OrderStatus, ShareRate};

// =============================================================================
// Line Plan
// =============================================================================

/// What checkout will do to one book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePlan {
    /// Quantity the basket asked for, as entered.
    pub requested: i64,
    /// Stock read inside the checkout transaction.
    pub stock_before: i64,
    /// Copies actually sold.
    pub sold: i64,
    /// Stock after the sale.
    pub new_stock: i64,
}

impl LinePlan {
    /// Clamps a requested quantity against the current stock.
    ///
    /// Negative requests sell nothing. Negative stock is treated as empty.
    ///
    /// ## Example
    /// ```rust
    /// use bookstore_core::checkout::LinePlan;
    ///
    /// let plan = LinePlan::new(8, 5);
    /// assert_eq!(plan.sold, 5);
    /// assert_eq!(plan.new_stock, 0);
    /// assert!(plan.is_clamped());
    /// ```
    pub fn new(requested: i64, stock: i64) -> Self {
        let available = stock.max(0);
        let sold = requested.max(0).min(available);

        LinePlan {
            requested,
            stock_before: stock,
            sold,
            new_stock: stock - sold,
        }
    }

    /// True when the request exceeded the stock on hand.
    #[inline]
    pub fn is_clamped(&self) -> bool {
        self.requested > self.stock_before
    }

    /// Copies asked for but not sold.
    #[inline]
    pub fn shortfall(&self) -> i64 {
        (self.requested - self.sold).max(0)
    }

    /// Line total at the given unit price.
    #[inline]
    pub fn line_total(&self, unit_price: Money) -> Money {
        unit_price.multiply_quantity(self.sold)
    }

    /// Amount credited to the publisher for this line.
    ///
    /// Rounded once on the line total, not per unit.
    pub fn publisher_credit(&self, unit_price: Money, share: ShareRate) -> Money {
        self.line_total(unit_price).share(share)
    }
}

// =============================================================================
// Clamp Notice
// =============================================================================

/// A basket line that asked for more copies than were in stock.
///
/// Checkout still succeeds; the notice is returned on the receipt and logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClampNotice {
    pub book_id: BookId,
    pub title: String,
    pub requested: i64,
    pub available: i64,
}

impl ClampNotice {
    /// Builds a notice from a plan, or `None` when nothing was clamped.
    pub fn from_plan(book_id: BookId, title: &str, plan: &LinePlan) -> Option<Self> {
        plan.is_clamped().then(|| ClampNotice {
            book_id,
            title: title.to_string(),
            requested: plan.requested,
            available: plan.stock_before.max(0),
        })
    }
}

impl fmt::Display for ClampNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "only {} of {} copies of '{}' (book {}) were available",
            self.available, self.requested, self.title, self.book_id
        )
    }
}

// =============================================================================
// Status Policy
// =============================================================================

/// How a new order's initial status is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Every new order starts `pending`.
    #[default]
    Pending,
    /// Uniform draw over all statuses. Used for demo data.
    Uniform,
}

impl StatusPolicy {
    /// Picks the status for a new order.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> OrderStatus {
        match self {
            StatusPolicy::Pending => OrderStatus::Pending,
            StatusPolicy::Uniform => {
                OrderStatus::ALL[rng.gen_range(0..OrderStatus::ALL.len())]
            }
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            StatusPolicy::Pending => "pending",
            StatusPolicy::Uniform => "uniform",
        }
    }
}

impl FromStr for StatusPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(StatusPolicy::Pending),
            "uniform" => Ok(StatusPolicy::Uniform),
            other => Err(ValidationError::InvalidFormat {
                field: "order status policy".to_string(),
                reason: format!("expected 'pending' or 'uniform', got '{other}'"),
            }),
        }
    }
}

impl fmt::Display for StatusPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
