//! # Report Repository
//!
//! Owner reports over the denormalized sales counters and banking balances.
//! Every report takes an optional case-insensitive name filter and is
//! ordered by name.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use bookstore_core::{PublisherProfit, SalesFigure};

use super::push_name_filter;
use crate::error::DbResult;

/// Repository for sales reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Units sold per genre.
    pub async fn genre_sales(&self, name_filter: Option<&str>) -> DbResult<Vec<SalesFigure>> {
        debug!(filter = ?name_filter, "Genre sales report");

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT name, sales FROM genre");
        push_name_filter(&mut qb, "name", name_filter);
        qb.push(" ORDER BY name");

        let rows = qb
            .build_query_as::<SalesFigure>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Units sold per author.
    pub async fn author_sales(&self, name_filter: Option<&str>) -> DbResult<Vec<SalesFigure>> {
        debug!(filter = ?name_filter, "Author sales report");

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT name, sales FROM author");
        push_name_filter(&mut qb, "name", name_filter);
        qb.push(" ORDER BY name, id");

        let rows = qb
            .build_query_as::<SalesFigure>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Banking balance per publisher.
    pub async fn publisher_profits(
        &self,
        name_filter: Option<&str>,
    ) -> DbResult<Vec<PublisherProfit>> {
        debug!(filter = ?name_filter, "Publisher profits report");

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT name, balance_cents FROM publisher_profits");
        push_name_filter(&mut qb, "name", name_filter);
        qb.push(" ORDER BY name");

        let rows = qb
            .build_query_as::<PublisherProfit>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
