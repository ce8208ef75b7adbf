//! # Search Repository
//!
//! Staged catalog search with a fuzzy title fallback. The criteria type,
//! LIKE escaping and edit distance live in `bookstore_core::search`.
//!
//! ## Query Per Stage
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Stage 1   SELECT book_id FROM book                                     │
//! │            WHERE title LIKE ? AND isbn LIKE ?                           │
//! │              AND pages BETWEEN .. AND price_cents BETWEEN ..            │
//! │                                                                         │
//! │  Fallback  SELECT book_id, title FROM book   → edit distance ≤ 16       │
//! │                                                                         │
//! │  Stage 2   book_author ⋈ author  WHERE name LIKE ?                      │
//! │                                    AND book_id IN (stage 1 query)       │
//! │                                                                         │
//! │  Stage 3   book_genre            WHERE genre_name LIKE ?                │
//! │                                    AND book_id IN (stage 2 or 1 query)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Later stages nest the earlier stage's query rather than binding its ids,
//! so every statement binds a handful of variables however large the
//! catalog grows.
//!
//! SQLite's LIKE is case-insensitive for ASCII, which is what the terminals
//! need for titles, names and genres.

use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use bookstore_core::search::{fuzzy_title_matches, like_pattern};
use bookstore_core::{BookId, CoreError, SearchCriteria, SearchOutcome};

use crate::error::DbResult;

/// Repository for catalog search.
#[derive(Debug, Clone)]
pub struct SearchRepository {
    pool: SqlitePool,
}

impl SearchRepository {
    /// Creates a new SearchRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SearchRepository { pool }
    }

    /// Runs a search.
    ///
    /// ## Errors
    /// `CoreError::Validation` if a range's minimum exceeds its maximum.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let outcome = db.search().search(&SearchCriteria::new().title("dog")).await?;
    /// if outcome.is_suggestion() {
    ///     println!("No exact matches. Did you mean:");
    /// }
    /// ```
    pub async fn search(&self, criteria: &SearchCriteria) -> DbResult<SearchOutcome> {
        criteria.validate().map_err(CoreError::from)?;

        let ids = self.catalog_stage(criteria).await?;
        debug!(matched = ids.len(), "Search stage 1 (catalog fields)");

        if ids.is_empty() {
            return match &criteria.title {
                Some(title) => {
                    let suggestions = self.fuzzy_titles(title).await?;
                    debug!(suggested = suggestions.len(), "Search fuzzy title fallback");
                    Ok(SearchOutcome::suggestions(suggestions))
                }
                None => Ok(SearchOutcome::NoMatches),
            };
        }

        let ids = match &criteria.author {
            Some(author) => {
                let narrowed = self.author_stage(criteria, author).await?;
                debug!(matched = narrowed.len(), "Search stage 2 (author)");
                narrowed
            }
            None => ids,
        };
        if ids.is_empty() {
            return Ok(SearchOutcome::NoMatches);
        }

        let ids = match &criteria.genre {
            Some(genre) => {
                let narrowed = self.genre_stage(criteria, genre).await?;
                debug!(matched = narrowed.len(), "Search stage 3 (genre)");
                narrowed
            }
            None => ids,
        };

        Ok(SearchOutcome::matches(ids))
    }

    async fn catalog_stage(&self, criteria: &SearchCriteria) -> DbResult<Vec<BookId>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("");
        push_catalog_query(&mut qb, criteria);
        qb.push(" ORDER BY book_id");

        self.fetch_ids(qb).await
    }

    async fn author_stage(&self, criteria: &SearchCriteria, author: &str) -> DbResult<Vec<BookId>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("");
        push_author_query(&mut qb, criteria, author);
        qb.push(" ORDER BY book_id");

        self.fetch_ids(qb).await
    }

    async fn genre_stage(&self, criteria: &SearchCriteria, genre: &str) -> DbResult<Vec<BookId>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT DISTINCT book_id FROM book_genre WHERE genre_name LIKE ");
        qb.push_bind(like_pattern(genre))
            .push(" ESCAPE '\\' AND book_id IN (");
        match &criteria.author {
            Some(author) => push_author_query(&mut qb, criteria, author),
            None => push_catalog_query(&mut qb, criteria),
        }
        qb.push(") ORDER BY book_id");

        self.fetch_ids(qb).await
    }

    async fn fuzzy_titles(&self, query: &str) -> DbResult<Vec<BookId>> {
        let rows = sqlx::query("SELECT book_id, title FROM book ORDER BY book_id")
            .fetch_all(&self.pool)
            .await?;

        let titles = rows
            .iter()
            .map(|row| {
                let id: BookId = row.try_get("book_id")?;
                let title: String = row.try_get("title")?;
                Ok((id, title))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(fuzzy_title_matches(
            query,
            titles.iter().map(|(id, title)| (*id, title.as_str())),
        ))
    }

    async fn fetch_ids(&self, mut qb: QueryBuilder<'_, Sqlite>) -> DbResult<Vec<BookId>> {
        let rows = qb.build().fetch_all(&self.pool).await?;
        let ids = rows
            .iter()
            .map(|row| row.try_get::<BookId, _>("book_id"))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}

/// `SELECT book_id FROM book` filtered by the catalog-field criteria.
fn push_catalog_query(qb: &mut QueryBuilder<'_, Sqlite>, criteria: &SearchCriteria) {
    qb.push("SELECT book_id FROM book WHERE 1 = 1");

    if let Some(title) = &criteria.title {
        qb.push(" AND title LIKE ")
            .push_bind(like_pattern(title))
            .push(" ESCAPE '\\'");
    }
    if let Some(isbn) = &criteria.isbn {
        qb.push(" AND isbn LIKE ")
            .push_bind(like_pattern(isbn))
            .push(" ESCAPE '\\'");
    }
    if let Some(min) = criteria.page_min {
        qb.push(" AND pages >= ").push_bind(min);
    }
    if let Some(max) = criteria.page_max {
        qb.push(" AND pages <= ").push_bind(max);
    }
    if let Some(min) = criteria.price_min_cents {
        qb.push(" AND price_cents >= ").push_bind(min);
    }
    if let Some(max) = criteria.price_max_cents {
        qb.push(" AND price_cents <= ").push_bind(max);
    }
}

/// Ids of books written by a matching author, within the catalog query.
fn push_author_query(qb: &mut QueryBuilder<'_, Sqlite>, criteria: &SearchCriteria, author: &str) {
    qb.push(
        "SELECT DISTINCT ba.book_id AS book_id FROM book_author ba \
         JOIN author a ON a.id = ba.author_id WHERE a.name LIKE ",
    );
    qb.push_bind(like_pattern(author))
        .push(" ESCAPE '\\' AND ba.book_id IN (");
    push_catalog_query(qb, criteria);
    qb.push(")");
}
