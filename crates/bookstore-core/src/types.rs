//! # Domain Types
//!
//! Core domain types used throughout the bookstore.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │      Order      │   │   PublisherInfo │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  header         │   │  publisher_id   │       │
//! │  │  title, isbn    │   │   order_num     │   │  name, phone    │       │
//! │  │  price_cents    │   │   status        │   │  address        │       │
//! │  │  stock          │   │  lines[]        │   │  balance_cents  │       │
//! │  │  share_bps      │   │   qty, price    │   │                 │       │
//! │  │  authors[]      │   │                 │   │                 │       │
//! │  │  genres[]       │   │                 │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   ShareRate     │   │   OrderStatus   │   │      Role       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Pending        │   │  Owner          │       │
//! │  │  3000 = 30%     │   │  Processing     │   │  Customer       │       │
//! │  └─────────────────┘   │  Shipped        │   └─────────────────┘       │
//! │                        │  Delivered      │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

/// Book identity (`book.book_id`).
pub type BookId = i64;

/// Author identity (`author.id`).
pub type AuthorId = i64;

/// Publisher identity (`publisher.publisher_id`).
pub type PublisherId = i64;

/// Externally visible order number (`orders.order_num`).
pub type OrderNumber = i64;

// =============================================================================
// Share Rate
// =============================================================================

/// Publisher revenue share in basis points.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 3000 bps = 30% of every sold unit's price goes to the publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShareRate(u32);

impl ShareRate {
    /// The full price (100%).
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a share rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        ShareRate(bps)
    }

    /// Creates a share rate from a fraction in `0.0..=1.0`.
    ///
    /// Values outside the range are clamped.
    pub fn from_fraction(fraction: f64) -> Self {
        let bps = (fraction * Self::MAX_BPS as f64).round();
        ShareRate(bps.clamp(0.0, Self::MAX_BPS as f64) as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction (for display only).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / Self::MAX_BPS as f64
    }

    /// Zero share.
    #[inline]
    pub const fn zero() -> Self {
        ShareRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ShareRate {
    fn default() -> Self {
        ShareRate::zero()
    }
}

// =============================================================================
// Book
// =============================================================================

/// A book with its joined author, genre and publisher names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub pages: i64,
    /// Price in cents.
    pub price_cents: i64,
    pub isbn: String,
    /// Copies on hand. Never negative.
    pub stock: i64,
    pub publisher_id: PublisherId,
    pub publisher_name: String,
    /// Publisher's cut of each sale in basis points.
    pub publisher_share_bps: u32,
    /// Author names, sorted.
    pub authors: Vec<String>,
    /// Genre names, sorted.
    pub genres: Vec<String>,
}

impl Book {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn publisher_share(&self) -> ShareRate {
        ShareRate::from_bps(self.publisher_share_bps)
    }
}

/// Fields needed to add a book to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub publisher_id: PublisherId,
    pub isbn: String,
    pub title: String,
    pub pages: i64,
    pub price_cents: i64,
    pub publisher_share_bps: u32,
    pub stock: i64,
    /// At least one author.
    pub author_ids: Vec<AuthorId>,
    /// At least one genre, by name.
    pub genres: Vec<String>,
}

// =============================================================================
// Authors, Genres, Publishers
// =============================================================================

/// An author and the units sold across all of their books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub sales: i64,
}

/// A genre (keyed by name) and the units sold in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Genre {
    pub name: String,
    pub sales: i64,
}

/// A publisher's contact details and banking balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PublisherInfo {
    pub publisher_id: PublisherId,
    pub name: String,
    pub phone_number: String,
    pub apt_number: Option<i64>,
    pub street_number: String,
    pub street_name: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub balance_cents: i64,
}

impl PublisherInfo {
    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_cents(self.balance_cents)
    }
}

/// Fields needed to register a publisher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPublisher {
    pub name: String,
    pub phone_number: String,
    pub street_number: String,
    pub street_name: String,
    pub apt_number: Option<i64>,
    pub postal_code: String,
    pub city: String,
    pub province: String,
}

// =============================================================================
// Reports
// =============================================================================

/// One row of the author or genre sales report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesFigure {
    pub name: String,
    pub sales: i64,
}

/// One row of the publisher profits report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PublisherProfit {
    pub name: String,
    pub balance_cents: i64,
}

impl PublisherProfit {
    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_cents(self.balance_cents)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, not yet picked.
    Pending,
    Processing,
    Shipped,
    Delivered,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ];

    /// The stored (lowercase) name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Orders
// =============================================================================

/// The order row itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderHeader {
    pub order_num: OrderNumber,
    pub status: OrderStatus,
    pub billing_info: String,
    pub shipping_info: String,
    pub placed_at: DateTime<Utc>,
}

/// A line item in an order.
/// Uses snapshot pattern to freeze title and price at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    /// `None` once the book has been removed from the catalog.
    pub book_id: Option<BookId>,
    /// Title at time of sale (frozen).
    pub title: String,
    /// Quantity actually sold (after clamping).
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
}

impl OrderLine {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// A committed order with its line items, as created by checkout and as
/// reconstructed by the order tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub header: OrderHeader,
    pub lines: Vec<OrderLine>,
}

impl Order {
    #[inline]
    pub fn order_num(&self) -> OrderNumber {
        self.header.order_num
    }

    #[inline]
    pub fn status(&self) -> OrderStatus {
        self.header.status
    }

    /// Σ unit price × quantity over all lines.
    pub fn total(&self) -> Money {
        self.lines.iter().map(OrderLine::line_total).sum()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// One row of the order list (header plus aggregates).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderSummary {
    pub order_num: OrderNumber,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
    pub line_count: i64,
    pub total_cents: i64,
}

impl OrderSummary {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Users
// =============================================================================

/// Which terminal a user may log into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Customer,
}

impl Role {
    pub const fn from_owner_flag(is_owner: bool) -> Self {
        if is_owner {
            Role::Owner
        } else {
            Role::Customer
        }
    }

    pub const fn is_owner(&self) -> bool {
        matches!(self, Role::Owner)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(qty: i64, price: i64) -> OrderLine {
        OrderLine {
            book_id: Some(1),
            title: "Loyal Beagle".to_string(),
            quantity: qty,
            unit_price_cents: price,
        }
    }

    #[test]
    fn test_share_rate_from_fraction() {
        assert_eq!(ShareRate::from_fraction(0.3).bps(), 3000);
        assert_eq!(ShareRate::from_fraction(0.07).bps(), 700);
        assert_eq!(ShareRate::from_fraction(1.5).bps(), 10_000);
        assert_eq!(ShareRate::from_fraction(-0.2).bps(), 0);
        assert!((ShareRate::from_bps(4500).fraction() - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_order_status_default_and_names() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(OrderStatus::Shipped.to_string(), "shipped");
        assert_eq!(OrderStatus::ALL.len(), 4);
    }

    #[test]
    fn test_order_status_serializes_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }

    #[test]
    fn test_order_total() {
        let order = Order {
            header: OrderHeader {
                order_num: 10_000,
                status: OrderStatus::Pending,
                billing_info: "Ottawa, ON".to_string(),
                shipping_info: "Ottawa, ON".to_string(),
                placed_at: Utc::now(),
            },
            lines: vec![line(5, 2000), line(2, 1099), line(0, 4500)],
        };

        assert_eq!(order.total().cents(), 12_198);
        assert_eq!(order.total_quantity(), 7);
    }

    #[test]
    fn test_role_from_owner_flag() {
        assert_eq!(Role::from_owner_flag(true), Role::Owner);
        assert!(!Role::from_owner_flag(false).is_owner());
    }
}
