//! # Basket
//!
//! The customer's pending selections for one terminal session.
//!
//! ## Basket Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Basket Operations                                    │
//! │                                                                         │
//! │  Terminal Action          Call                    Basket Change         │
//! │  ───────────────          ────                    ─────────────         │
//! │                                                                         │
//! │  "Add To Checkout" ──────► add(id, qty) ────────► qty[id] += qty        │
//! │                                                                         │
//! │  Clear basket ───────────► clear() ─────────────► entries.clear()       │
//! │                                                                         │
//! │  Checkout ───────────────► OrderCommitter::commit(&mut basket)          │
//! │                            └── clears on success, untouched on failure  │
//! │                                                                         │
//! │  NOTE: Stock is NOT checked here. A basket may ask for more copies     │
//! │        than exist; checkout clamps against live stock.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The basket is owned by the session and handed to the committer by
//! `&mut`. There is no process-wide basket.

use serde::{Deserialize, Serialize};

use crate::types::BookId;

/// One requested book and how many copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketEntry {
    pub book_id: BookId,
    pub quantity: i64,
}

/// Pending (book, quantity) selections.
///
/// ## Invariants
/// - Entries are unique by `book_id` (adding the same book sums quantities)
/// - Entries keep first-insertion order, which is the checkout order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    entries: Vec<BasketEntry>,
}

impl Basket {
    /// Creates a new empty basket.
    pub fn new() -> Self {
        Basket::default()
    }

    /// Adds copies of a book, merging with any quantity already requested.
    /// Merged quantities saturate at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use bookstore_core::basket::Basket;
    ///
    /// let mut basket = Basket::new();
    /// basket.add(7, 3);
    /// basket.add(7, 5);
    /// assert_eq!(basket.quantity_of(7), Some(8));
    /// assert_eq!(basket.len(), 1);
    /// ```
    pub fn add(&mut self, book_id: BookId, quantity: i64) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.book_id == book_id) {
            entry.quantity = entry.quantity.saturating_add(quantity);
            return;
        }

        self.entries.push(BasketEntry { book_id, quantity });
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in checkout order.
    pub fn entries(&self) -> &[BasketEntry] {
        &self.entries
    }

    /// Requested quantity for a book, if it is in the basket.
    pub fn quantity_of(&self, book_id: BookId) -> Option<i64> {
        self.entries
            .iter()
            .find(|e| e.book_id == book_id)
            .map(|e| e.quantity)
    }

    /// Number of distinct books.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total copies requested across all books.
    pub fn total_quantity(&self) -> i64 {
        self.entries
            .iter()
            .fold(0i64, |total, e| total.saturating_add(e.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basket_add_item() {
        let mut basket = Basket::new();
        basket.add(3, 2);

        assert_eq!(basket.len(), 1);
        assert_eq!(basket.total_quantity(), 2);
        assert_eq!(basket.entries()[0], BasketEntry { book_id: 3, quantity: 2 });
    }

    #[test]
    fn test_basket_add_same_book_sums_quantity() {
        let mut basket = Basket::new();
        basket.add(3, 2);
        basket.add(3, 3);

        assert_eq!(basket.len(), 1);
        assert_eq!(basket.quantity_of(3), Some(5));
    }

    #[test]
    fn test_basket_keeps_insertion_order() {
        let mut basket = Basket::new();
        basket.add(9, 1);
        basket.add(2, 1);
        basket.add(9, 4);
        basket.add(5, 1);

        let ids: Vec<BookId> = basket.entries().iter().map(|e| e.book_id).collect();
        assert_eq!(ids, vec![9, 2, 5]);
    }

    #[test]
    fn test_basket_accepts_quantities_beyond_stock() {
        let mut basket = Basket::new();
        basket.add(7, 8_000);
        assert_eq!(basket.quantity_of(7), Some(8_000));
    }

    #[test]
    fn test_basket_merge_saturates() {
        let mut basket = Basket::new();
        basket.add(7, i64::MAX);
        basket.add(7, 1);
        assert_eq!(basket.quantity_of(7), Some(i64::MAX));

        basket.add(8, i64::MAX);
        assert_eq!(basket.total_quantity(), i64::MAX);

        basket.add(9, i64::MIN);
        basket.add(9, -1);
        assert_eq!(basket.quantity_of(9), Some(i64::MIN));
    }

    #[test]
    fn test_basket_clear() {
        let mut basket = Basket::new();
        basket.add(1, 2);
        assert!(!basket.is_empty());

        basket.clear();
        assert!(basket.is_empty());
        assert_eq!(basket.quantity_of(1), None);
    }
}
