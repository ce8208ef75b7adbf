//! # Catalog Repository
//!
//! Book, author and genre records.
//!
//! ## Book Assembly
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list_books(filter)                                                     │
//! │                                                                         │
//! │  1. book ⋈ publisher            → scalar fields + publisher name        │
//! │  2. book_author ⋈ author        → author names per book (by name)       │
//! │  3. book_genre                  → genre names per book (by name)        │
//! │                                                                         │
//! │  Three queries for the whole catalog. A filter is bound as an IN list   │
//! │  of at most MAX_BOUND_IDS ids; longer filters run once per chunk.       │
//! │  get_book(id) is list_books(Some(&[id])).                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::collections::HashMap;
use tracing::{debug, info};

use bookstore_core::{
    Author, AuthorId, Book, BookId, CoreError, Genre, NewBook, PublisherId, ShareRate,
    ValidationError,
};

use super::{push_id_list, MAX_BOUND_IDS};
use crate::error::{DbError, DbResult};

/// Scalar columns of a book plus its publisher's name.
#[derive(sqlx::FromRow)]
struct BookRow {
    book_id: i64,
    title: String,
    pages: i64,
    price_cents: i64,
    isbn: String,
    stock: i64,
    publisher_id: PublisherId,
    publisher_name: String,
    publisher_share_bps: i64,
}

impl BookRow {
    fn into_book(self, authors: Vec<String>, genres: Vec<String>) -> Book {
        Book {
            id: self.book_id,
            title: self.title,
            pages: self.pages,
            price_cents: self.price_cents,
            isbn: self.isbn,
            stock: self.stock,
            publisher_id: self.publisher_id,
            publisher_name: self.publisher_name,
            // CHECK constraint keeps this within 0..=10000
            publisher_share_bps: self
                .publisher_share_bps
                .clamp(0, i64::from(ShareRate::MAX_BPS)) as u32,
            authors,
            genres,
        }
    }
}

/// Repository for catalog database operations.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Gets a book with its authors, genres and publisher name.
    ///
    /// ## Returns
    /// * `Ok(Some(book))` - Book found
    /// * `Ok(None)` - No book with that id
    pub async fn get_book(&self, id: BookId) -> DbResult<Option<Book>> {
        debug!(book_id = id, "Getting book");
        let mut books = self.list_books(Some(&[id])).await?;
        Ok(books.pop())
    }

    /// Lists books ascending by id, optionally only those in `filter`.
    ///
    /// Unknown or repeated ids in the filter are skipped. An empty filter
    /// lists nothing.
    pub async fn list_books(&self, filter: Option<&[BookId]>) -> DbResult<Vec<Book>> {
        debug!(filter_len = filter.map(<[BookId]>::len), "Listing books");

        let Some(ids) = filter else {
            return self.load_books(None).await;
        };

        let mut books = Vec::new();
        for chunk in ids.chunks(MAX_BOUND_IDS) {
            books.extend(self.load_books(Some(chunk)).await?);
        }
        if ids.len() > MAX_BOUND_IDS {
            books.sort_by_key(|b| b.id);
            books.dedup_by_key(|b| b.id);
        }
        Ok(books)
    }

    /// Books in `ids` (every book when `None`), ascending by id.
    async fn load_books(&self, ids: Option<&[BookId]>) -> DbResult<Vec<Book>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT
                b.book_id,
                b.title,
                b.pages,
                b.price_cents,
                b.isbn,
                b.stock,
                b.publisher_id,
                p.name AS publisher_name,
                b.publisher_share_bps
            FROM book b
            JOIN publisher p ON p.publisher_id = b.publisher_id
            "#,
        );
        if let Some(ids) = ids {
            qb.push(" WHERE b.book_id IN ");
            push_id_list(&mut qb, ids);
        }
        qb.push(" ORDER BY b.book_id");

        let rows = qb.build_query_as::<BookRow>().fetch_all(&self.pool).await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // Whole-catalog loads skip the IN list.
        let row_ids: Vec<BookId> = rows.iter().map(|r| r.book_id).collect();
        let bound = ids.map(|_| row_ids.as_slice());
        let mut authors = self.names_by_book(bound, NameLink::Author).await?;
        let mut genres = self.names_by_book(bound, NameLink::Genre).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = row.book_id;
                row.into_book(
                    authors.remove(&id).unwrap_or_default(),
                    genres.remove(&id).unwrap_or_default(),
                )
            })
            .collect())
    }

    /// Author or genre names for each book in `ids` (every book when `None`),
    /// each list sorted by name.
    async fn names_by_book(
        &self,
        ids: Option<&[BookId]>,
        link: NameLink,
    ) -> DbResult<HashMap<BookId, Vec<String>>> {
        let (select, id_column) = match link {
            NameLink::Author => (
                "SELECT ba.book_id, a.name FROM book_author ba \
                 JOIN author a ON a.id = ba.author_id",
                "ba.book_id",
            ),
            NameLink::Genre => (
                "SELECT book_id, genre_name AS name FROM book_genre",
                "book_id",
            ),
        };

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(select);
        if let Some(ids) = ids {
            qb.push(" WHERE ").push(id_column).push(" IN ");
            push_id_list(&mut qb, ids);
        }
        qb.push(" ORDER BY name");

        let rows = qb.build().fetch_all(&self.pool).await?;

        let mut names: HashMap<BookId, Vec<String>> = HashMap::new();
        for row in rows {
            let book_id: BookId = row.try_get("book_id")?;
            let name: String = row.try_get("name")?;
            names.entry(book_id).or_default().push(name);
        }
        Ok(names)
    }

    /// Number of books in the catalog.
    pub async fn count_books(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Adds a book and links it to its authors and genres.
    ///
    /// ## Transaction
    /// Book row and link rows are written together; an unknown publisher,
    /// author or genre leaves nothing behind.
    ///
    /// ## Returns
    /// The new book's id.
    pub async fn insert_book(&self, book: &NewBook) -> DbResult<BookId> {
        if book.author_ids.is_empty() {
            return Err(CoreError::from(ValidationError::Required {
                field: "authors".to_string(),
            })
            .into());
        }
        if book.genres.is_empty() {
            return Err(CoreError::from(ValidationError::Required {
                field: "genres".to_string(),
            })
            .into());
        }

        debug!(title = %book.title, publisher_id = book.publisher_id, "Inserting book");

        let mut tx = self.pool.begin().await?;

        let book_id = sqlx::query(
            r#"
            INSERT INTO book (
                publisher_id, isbn, title, pages,
                price_cents, publisher_share_bps, stock
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(book.publisher_id)
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(book.pages)
        .bind(book.price_cents)
        .bind(book.publisher_share_bps as i64)
        .bind(book.stock)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for author_id in &book.author_ids {
            sqlx::query("INSERT OR IGNORE INTO book_author (book_id, author_id) VALUES (?1, ?2)")
                .bind(book_id)
                .bind(author_id)
                .execute(&mut *tx)
                .await?;
        }

        for genre in &book.genres {
            sqlx::query("INSERT OR IGNORE INTO book_genre (book_id, genre_name) VALUES (?1, ?2)")
                .bind(book_id)
                .bind(genre)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(book_id, title = %book.title, "Book added to catalog");
        Ok(book_id)
    }

    /// Removes a book from the catalog.
    ///
    /// Author and genre links go with it. Order lines keep their title and
    /// price snapshot; their book reference becomes NULL.
    ///
    /// ## Returns
    /// `false` if no book had that id.
    pub async fn remove_book(&self, id: BookId) -> DbResult<bool> {
        debug!(book_id = id, "Removing book");

        let result = sqlx::query("DELETE FROM book WHERE book_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(book_id = id, "Book removed from catalog");
        }
        Ok(removed)
    }

    /// Lists authors by name.
    pub async fn list_authors(&self) -> DbResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            "SELECT id, name, sales FROM author ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    /// Lists genres by name.
    pub async fn list_genres(&self) -> DbResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT name, sales FROM genre ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(genres)
    }

    /// Adds an author with zero sales.
    pub async fn insert_author(&self, name: &str) -> DbResult<AuthorId> {
        debug!(name = %name, "Inserting author");

        let id = sqlx::query("INSERT INTO author (name, sales) VALUES (?1, 0)")
            .bind(name)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(id)
    }

    /// Adds a genre with zero sales.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` if the genre already exists.
    pub async fn insert_genre(&self, name: &str) -> DbResult<()> {
        debug!(name = %name, "Inserting genre");

        sqlx::query("INSERT INTO genre (name, sales) VALUES (?1, 0)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { field, .. } => DbError::duplicate(field, name),
                other => other,
            })?;

        Ok(())
    }
}

#[derive(Clone, Copy)]
enum NameLink {
    Author,
    Genre,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fixture, insert_bulk_books, new_book};

    /// More books than SQLite allows bound variables in one statement.
    const LARGE_CATALOG: i64 = 33_001;

    #[tokio::test]
    async fn test_get_book_assembles_joined_fields() {
        let (db, ids) = fixture().await;

        let book = db.catalog().get_book(ids.beagle).await.unwrap().unwrap();
        assert_eq!(book.id, ids.beagle);
        assert_eq!(book.title, "The Loyal Beagle of Kingsmere");
        assert_eq!(book.stock, 5);
        assert_eq!(book.price_cents, 2000);
        assert_eq!(book.publisher_share_bps, 3000);
        assert_eq!(book.publisher_name, "Maple Leaf Press");
        assert_eq!(book.authors, vec!["Ann Avery", "Bo Brennan"]);
        assert_eq!(book.genres, vec!["Adventure", "Animals"]);
    }

    #[tokio::test]
    async fn test_get_book_unknown_is_none() {
        let (db, _) = fixture().await;
        assert!(db.catalog().get_book(9_999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_book_is_repeatable() {
        let (db, ids) = fixture().await;
        let first = db.catalog().get_book(ids.hunt).await.unwrap();
        let second = db.catalog().get_book(ids.hunt).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_list_books_ascending_and_filtered() {
        let (db, ids) = fixture().await;

        let all = db.catalog().list_books(None).await.unwrap();
        let all_ids: Vec<BookId> = all.iter().map(|b| b.id).collect();
        let mut sorted = all_ids.clone();
        sorted.sort();
        assert_eq!(all_ids, sorted);
        assert_eq!(all.len(), 4);

        let some = db
            .catalog()
            .list_books(Some(&[ids.hunt, 9_999, ids.beagle]))
            .await
            .unwrap();
        let some_ids: Vec<BookId> = some.iter().map(|b| b.id).collect();
        assert_eq!(some_ids, vec![ids.hunt, ids.beagle]);

        assert!(db.catalog().list_books(Some(&[])).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_books_large_catalog() {
        let (db, ids) = fixture().await;
        insert_bulk_books(&db, 1_000, LARGE_CATALOG, ids.publisher, ids.author_avery, "Mystery")
            .await;
        let catalog = db.catalog();

        let all = catalog.list_books(None).await.unwrap();
        assert_eq!(all.len() as i64, 4 + LARGE_CATALOG);
        assert_eq!(all[1].authors, vec!["Ann Avery", "Bo Brennan"]);
        let last = all.last().unwrap();
        assert_eq!(last.id, 1_000 + LARGE_CATALOG - 1);
        assert_eq!(last.authors, vec!["Ann Avery"]);
        assert_eq!(last.genres, vec!["Mystery"]);

        // Filter spans several chunks, in reverse and with a repeat.
        let mut wanted: Vec<BookId> = all.iter().map(|b| b.id).rev().collect();
        wanted.push(ids.beagle);
        let filtered = catalog.list_books(Some(&wanted)).await.unwrap();
        assert_eq!(filtered, all);
    }

    #[tokio::test]
    async fn test_insert_and_remove_book() {
        let (db, ids) = fixture().await;
        let catalog = db.catalog();

        let id = catalog
            .insert_book(&new_book(ids.publisher, vec![ids.author_avery], "Mystery"))
            .await
            .unwrap();
        let book = catalog.get_book(id).await.unwrap().unwrap();
        assert_eq!(book.authors, vec!["Ann Avery"]);
        assert_eq!(book.genres, vec!["Mystery"]);
        assert_eq!(catalog.count_books().await.unwrap(), 5);

        assert!(catalog.remove_book(id).await.unwrap());
        assert!(catalog.get_book(id).await.unwrap().is_none());
        assert!(!catalog.remove_book(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_book_requires_authors_and_genres() {
        let (db, ids) = fixture().await;

        let mut book = new_book(ids.publisher, vec![], "Mystery");
        let err = db.catalog().insert_book(&book).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));

        book.author_ids = vec![ids.author_avery];
        book.genres.clear();
        assert!(db.catalog().insert_book(&book).await.is_err());
    }

    #[tokio::test]
    async fn test_insert_book_unknown_genre_rolls_back() {
        let (db, ids) = fixture().await;

        let err = db
            .catalog()
            .insert_book(&new_book(ids.publisher, vec![ids.author_avery], "Nonexistent"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(db.catalog().count_books().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_authors_and_genres() {
        let (db, _) = fixture().await;
        let catalog = db.catalog();

        let id = catalog.insert_author("Zed Zimmer").await.unwrap();
        let authors = catalog.list_authors().await.unwrap();
        assert_eq!(authors.last().map(|a| a.id), Some(id));
        assert!(authors.iter().all(|a| a.sales == 0));

        catalog.insert_genre("Poetry").await.unwrap();
        let err = catalog.insert_genre("Poetry").await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        let names: Vec<String> = catalog
            .list_genres()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Adventure", "Animals", "Mystery", "Poetry"]);
    }
}
