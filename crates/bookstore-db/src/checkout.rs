//! # Order Committer
//!
//! Turns a basket into an order inside one SQLite transaction.
//!
//! ## Transaction Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  commit(basket)                                                         │
//! │                                                                         │
//! │  basket empty? ──yes──► CoreError::EmptyBasket (nothing written)        │
//! │       │                                                                 │
//! │  BEGIN                                                                  │
//! │   ├── INSERT orders                       → order_num (10000, 10001..)  │
//! │   └── for each basket entry, in basket order:                           │
//! │        ├── SELECT book            (title, price, share, stock)          │
//! │        ├── LinePlan::new(requested, stock)                              │
//! │        ├── UPDATE book.stock      WHERE stock = <value just read>       │
//! │        ├── INSERT order_book      (title + price snapshot)              │
//! │        ├── UPDATE author.sales    += sold, every author of the book     │
//! │        ├── UPDATE genre.sales     += sold, every genre of the book      │
//! │        └── UPDATE publisher_banking += credit                           │
//! │  COMMIT ──► basket cleared, receipt returned                            │
//! │                                                                         │
//! │  Any failure: transaction dropped (ROLLBACK), basket left as it was,    │
//! │  error reported as DbError::CheckoutAborted { stage, book_id, .. }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stock update is a compare-and-set against the value read in the same
//! transaction, so a concurrent writer can never drive stock negative.

use chrono::{SubsecRound, Utc};
use rand::Rng;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, error, info, warn};

use bookstore_core::{
    Basket, BasketEntry, BookId, ClampNotice, CoreError, LinePlan, Money, Order, OrderHeader,
    OrderLine, OrderNumber, OrderStatus, PublisherId, ShareRate, StatusPolicy,
};

use crate::error::{CheckoutStage, DbError, DbResult};

// =============================================================================
// Receipt
// =============================================================================

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    /// The order exactly as it was written.
    pub order: Order,
    /// Lines that asked for more copies than were in stock.
    pub clamps: Vec<ClampNotice>,
}

impl CheckoutReceipt {
    #[inline]
    pub fn total(&self) -> Money {
        self.order.total()
    }

    #[inline]
    pub fn is_clamped(&self) -> bool {
        !self.clamps.is_empty()
    }
}

// =============================================================================
// Committer
// =============================================================================

#[derive(sqlx::FromRow)]
struct StockRow {
    title: String,
    price_cents: i64,
    publisher_share_bps: i64,
    publisher_id: PublisherId,
    stock: i64,
}

/// Commits baskets as orders.
#[derive(Debug, Clone)]
pub struct OrderCommitter {
    pool: SqlitePool,
    policy: StatusPolicy,
}

impl OrderCommitter {
    /// Creates a committer that picks initial statuses with `policy`.
    pub fn new(pool: SqlitePool, policy: StatusPolicy) -> Self {
        OrderCommitter { pool, policy }
    }

    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    /// Commits the basket as one order.
    ///
    /// On success the basket is emptied. On any error it is left untouched
    /// and no row in the store has changed.
    ///
    /// ## Errors
    /// * `DbError::Core(CoreError::EmptyBasket)` - nothing to commit
    /// * `DbError::CheckoutAborted` - a step inside the transaction failed
    ///
    /// ## Example
    /// ```rust,ignore
    /// let mut basket = Basket::new();
    /// basket.add(7, 8);
    ///
    /// let receipt = db.committer(StatusPolicy::Pending)
    ///     .commit(&mut basket, "12 Bank St", "12 Bank St")
    ///     .await?;
    /// for clamp in &receipt.clamps {
    ///     println!("Note: {clamp}");
    /// }
    /// println!("Order #{} placed", receipt.order.order_num());
    /// ```
    pub async fn commit(
        &self,
        basket: &mut Basket,
        billing_info: &str,
        shipping_info: &str,
    ) -> DbResult<CheckoutReceipt> {
        if basket.is_empty() {
            return Err(CoreError::EmptyBasket.into());
        }
        // ThreadRng is !Send, so the draw happens before the first await.
        let status = self.policy.choose(&mut rand::thread_rng());
        self.commit_as(basket, billing_info, shipping_info, status).await
    }

    /// Like [`commit`](Self::commit), drawing the status from `rng`.
    pub async fn commit_with_rng<R: Rng + ?Sized>(
        &self,
        basket: &mut Basket,
        billing_info: &str,
        shipping_info: &str,
        rng: &mut R,
    ) -> DbResult<CheckoutReceipt> {
        if basket.is_empty() {
            return Err(CoreError::EmptyBasket.into());
        }
        let status = self.policy.choose(rng);
        self.commit_as(basket, billing_info, shipping_info, status).await
    }

    async fn commit_as(
        &self,
        basket: &mut Basket,
        billing_info: &str,
        shipping_info: &str,
        status: OrderStatus,
    ) -> DbResult<CheckoutReceipt> {
        debug!(lines = basket.len(), %status, "Committing basket");

        match self.write_order(basket, billing_info, shipping_info, status).await {
            Ok(receipt) => {
                basket.clear();
                info!(
                    order_num = receipt.order.order_num(),
                    lines = receipt.order.lines.len(),
                    total = %receipt.total(),
                    clamped = receipt.clamps.len(),
                    "Order committed"
                );
                Ok(receipt)
            }
            Err(e) => {
                error!(error = %e, "Checkout failed, nothing was written");
                Err(e)
            }
        }
    }

    async fn write_order(
        &self,
        basket: &Basket,
        billing_info: &str,
        shipping_info: &str,
        status: OrderStatus,
    ) -> DbResult<CheckoutReceipt> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| abort(None, CheckoutStage::Begin, e))?;

        let placed_at = Utc::now().trunc_subsecs(0);

        let order_num: OrderNumber = sqlx::query(
            r#"
            INSERT INTO orders (status, billing_info, shipping_info, placed_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(status)
        .bind(billing_info)
        .bind(shipping_info)
        .bind(placed_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| abort(None, CheckoutStage::InsertOrder, e))?
        .last_insert_rowid();

        let mut lines = Vec::with_capacity(basket.len());
        let mut clamps = Vec::new();

        for entry in basket.entries() {
            let (line, clamp) = write_line(&mut *tx, order_num, entry).await?;
            if let Some(clamp) = clamp {
                warn!(order_num, book_id = clamp.book_id, "Quantity clamped: {clamp}");
                clamps.push(clamp);
            }
            lines.push(line);
        }

        tx.commit()
            .await
            .map_err(|e| abort(None, CheckoutStage::Commit, e))?;

        let order = Order {
            header: OrderHeader {
                order_num,
                status,
                billing_info: billing_info.to_string(),
                shipping_info: shipping_info.to_string(),
                placed_at,
            },
            lines,
        };

        Ok(CheckoutReceipt { order, clamps })
    }
}

fn abort(book_id: Option<BookId>, stage: CheckoutStage, err: sqlx::Error) -> DbError {
    DbError::checkout_aborted(book_id, stage, DbError::from(err))
}

/// Writes one basket entry against an open transaction.
async fn write_line(
    conn: &mut SqliteConnection,
    order_num: OrderNumber,
    entry: &BasketEntry,
) -> DbResult<(OrderLine, Option<ClampNotice>)> {
    let book_id = entry.book_id;

    let book = sqlx::query_as::<_, StockRow>(
        r#"
        SELECT title, price_cents, publisher_share_bps, publisher_id, stock
        FROM book
        WHERE book_id = ?1
        "#,
    )
    .bind(book_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| abort(Some(book_id), CheckoutStage::ReadBook, e))?
    .ok_or_else(|| {
        DbError::checkout_aborted(
            Some(book_id),
            CheckoutStage::ReadBook,
            CoreError::BookNotFound(book_id),
        )
    })?;

    let plan = LinePlan::new(entry.quantity, book.stock);
    let unit_price = Money::from_cents(book.price_cents);
    let share_bps = book.publisher_share_bps.clamp(0, i64::from(ShareRate::MAX_BPS));
    let share = ShareRate::from_bps(share_bps as u32);

    let updated = sqlx::query("UPDATE book SET stock = ?1 WHERE book_id = ?2 AND stock = ?3")
        .bind(plan.new_stock)
        .bind(book_id)
        .bind(plan.stock_before)
        .execute(&mut *conn)
        .await
        .map_err(|e| abort(Some(book_id), CheckoutStage::UpdateStock, e))?
        .rows_affected();
    if updated == 0 {
        return Err(DbError::checkout_aborted(
            Some(book_id),
            CheckoutStage::UpdateStock,
            "stock changed during checkout",
        ));
    }

    sqlx::query(
        r#"
        INSERT INTO order_book (order_num, book_id, title_snapshot, quantity, unit_price_cents)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(order_num)
    .bind(book_id)
    .bind(&book.title)
    .bind(plan.sold)
    .bind(book.price_cents)
    .execute(&mut *conn)
    .await
    .map_err(|e| abort(Some(book_id), CheckoutStage::InsertLine, e))?;

    sqlx::query(
        r#"
        UPDATE author SET sales = sales + ?1
        WHERE id IN (SELECT author_id FROM book_author WHERE book_id = ?2)
        "#,
    )
    .bind(plan.sold)
    .bind(book_id)
    .execute(&mut *conn)
    .await
    .map_err(|e| abort(Some(book_id), CheckoutStage::AuthorSales, e))?;

    sqlx::query(
        r#"
        UPDATE genre SET sales = sales + ?1
        WHERE name IN (SELECT genre_name FROM book_genre WHERE book_id = ?2)
        "#,
    )
    .bind(plan.sold)
    .bind(book_id)
    .execute(&mut *conn)
    .await
    .map_err(|e| abort(Some(book_id), CheckoutStage::GenreSales, e))?;

    let credit = plan.publisher_credit(unit_price, share);
    let credited = sqlx::query(
        r#"
        UPDATE publisher_banking SET balance_cents = balance_cents + ?1
        WHERE id = (SELECT banking_id FROM publisher WHERE publisher_id = ?2)
        "#,
    )
    .bind(credit.cents())
    .bind(book.publisher_id)
    .execute(&mut *conn)
    .await
    .map_err(|e| abort(Some(book_id), CheckoutStage::PublisherBalance, e))?
    .rows_affected();
    if credited == 0 {
        return Err(DbError::checkout_aborted(
            Some(book_id),
            CheckoutStage::PublisherBalance,
            format!("publisher {} has no banking account", book.publisher_id),
        ));
    }

    debug!(
        order_num,
        book_id,
        requested = plan.requested,
        sold = plan.sold,
        new_stock = plan.new_stock,
        credit = %credit,
        "Order line written"
    );

    let clamp = ClampNotice::from_plan(book_id, &book.title, &plan);
    let line = OrderLine {
        book_id: Some(book_id),
        title: book.title,
        quantity: plan.sold,
        unit_price_cents: book.price_cents,
    };

    Ok((line, clamp))
}

// =============================================================================
// Unit Tests
// =============================================================================
