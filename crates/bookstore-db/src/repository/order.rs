//! # Order Repository
//!
//! Read-only order tracking. Orders are written only by
//! [`OrderCommitter`](crate::checkout::OrderCommitter).
//!
//! ## Reconstruction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get_order(10001)                                                       │
//! │                                                                         │
//! │  orders      WHERE order_num = 10001  → OrderHeader                     │
//! │  order_book  WHERE order_num = 10001  → OrderLine[] (insertion order)   │
//! │                                                                         │
//! │  total = Σ unit_price_cents × quantity   (exact, integer cents)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use bookstore_core::{Order, OrderHeader, OrderLine, OrderNumber, OrderSummary};

use crate::error::DbResult;

/// Repository for order lookups.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order with its line items.
    ///
    /// ## Returns
    /// * `Ok(Some(order))` - Header plus lines in the order they were written
    /// * `Ok(None)` - No such order number
    pub async fn get_order(&self, order_num: OrderNumber) -> DbResult<Option<Order>> {
        debug!(order_num, "Getting order");

        let header = sqlx::query_as::<_, OrderHeader>(
            r#"
            SELECT order_num, status, billing_info, shipping_info, placed_at
            FROM orders
            WHERE order_num = ?1
            "#,
        )
        .bind(order_num)
        .fetch_optional(&self.pool)
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT
                book_id,
                title_snapshot AS title,
                quantity,
                unit_price_cents
            FROM order_book
            WHERE order_num = ?1
            ORDER BY line_id
            "#,
        )
        .bind(order_num)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Order { header, lines }))
    }

    /// Lists every order, newest first, with line count and total.
    pub async fn list_orders(&self) -> DbResult<Vec<OrderSummary>> {
        debug!("Listing orders");

        let orders = sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT
                o.order_num,
                o.status,
                o.placed_at,
                COUNT(ob.line_id) AS line_count,
                COALESCE(SUM(ob.quantity * ob.unit_price_cents), 0) AS total_cents
            FROM orders o
            LEFT JOIN order_book ob ON ob.order_num = o.order_num
            GROUP BY o.order_num
            ORDER BY o.order_num DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }
}
