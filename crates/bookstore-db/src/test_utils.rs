//! Shared fixture for the in-memory database tests.
//!
//! ```text
//! id  title                          pages  price   share  stock  publisher
//! 3   Brave Hunt                     320    $15.99  25%    10     Harbour Books
//! 7   The Loyal Beagle of Kingsmere  180    $20.00  30%    5      Maple Leaf Press
//! 12  An Extraordinarily Long Title  640    $45.00  10%    0      Maple Leaf Press
//! 15  Cats of the Harbour Quarter    96     $10.99  33%    2      Harbour Books
//! ```
//!
//! Only "Brave Hunt" is within fuzzy distance of "dog" (distance 10).

use bookstore_core::{AuthorId, BookId, NewBook, NewPublisher, PublisherId};

use crate::pool::{Database, DbConfig};

pub(crate) struct FixtureIds {
    pub publisher: PublisherId,
    pub harbour: PublisherId,
    pub author_avery: AuthorId,
    pub author_brennan: AuthorId,
    pub author_castillo: AuthorId,
    pub hunt: BookId,
    pub beagle: BookId,
    pub long: BookId,
    pub cats: BookId,
}

pub(crate) fn new_publisher(name: &str, postal_code: &str) -> NewPublisher {
    NewPublisher {
        name: name.to_string(),
        phone_number: "613-555-0142".to_string(),
        street_number: "125".to_string(),
        street_name: "Sussex Drive".to_string(),
        apt_number: None,
        postal_code: postal_code.to_string(),
        city: "Ottawa".to_string(),
        province: "ON".to_string(),
    }
}

pub(crate) fn new_book(
    publisher_id: PublisherId,
    author_ids: Vec<AuthorId>,
    genre: &str,
) -> NewBook {
    NewBook {
        publisher_id,
        isbn: "059000001".to_string(),
        title: "Quiet Harbour".to_string(),
        pages: 200,
        price_cents: 1250,
        publisher_share_bps: 2000,
        stock: 4,
        author_ids,
        genres: vec![genre.to_string()],
    }
}

async fn insert_book_row(
    db: &Database,
    id: BookId,
    publisher_id: PublisherId,
    (isbn, title, pages, price_cents, share_bps, stock): (&str, &str, i64, i64, i64, i64),
    author_ids: &[AuthorId],
    genres: &[&str],
) {
    sqlx::query(
        "INSERT INTO book (book_id, publisher_id, isbn, title, pages, price_cents, \
         publisher_share_bps, stock) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(id)
    .bind(publisher_id)
    .bind(isbn)
    .bind(title)
    .bind(pages)
    .bind(price_cents)
    .bind(share_bps)
    .bind(stock)
    .execute(db.pool())
    .await
    .unwrap();

    for author_id in author_ids {
        sqlx::query("INSERT INTO book_author (book_id, author_id) VALUES (?1, ?2)")
            .bind(id)
            .bind(*author_id)
            .execute(db.pool())
            .await
            .unwrap();
    }
    for genre in genres {
        sqlx::query("INSERT INTO book_genre (book_id, genre_name) VALUES (?1, ?2)")
            .bind(id)
            .bind(*genre)
            .execute(db.pool())
            .await
            .unwrap();
    }
}

/// Fresh in-memory store with two publishers, three authors, three genres
/// and four books.
pub(crate) async fn fixture() -> (Database, FixtureIds) {
    fixture_with(DbConfig::in_memory()).await
}

/// The same store as [`fixture`] on an arbitrary (empty) database.
pub(crate) async fn fixture_with(config: DbConfig) -> (Database, FixtureIds) {
    let db = Database::new(config).await.unwrap();

    let publisher = db
        .publishers()
        .insert_publisher(&new_publisher("Maple Leaf Press", "K1A0B1"))
        .await
        .unwrap();
    let harbour = db
        .publishers()
        .insert_publisher(&new_publisher("Harbour Books", "K1A0B1"))
        .await
        .unwrap();

    let catalog = db.catalog();
    let author_avery = catalog.insert_author("Ann Avery").await.unwrap();
    let author_brennan = catalog.insert_author("Bo Brennan").await.unwrap();
    let author_castillo = catalog.insert_author("Cy Castillo").await.unwrap();
    for genre in ["Adventure", "Animals", "Mystery"] {
        catalog.insert_genre(genre).await.unwrap();
    }

    let ids = FixtureIds {
        publisher,
        harbour,
        author_avery,
        author_brennan,
        author_castillo,
        hunt: 3,
        beagle: 7,
        long: 12,
        cats: 15,
    };

    insert_book_row(
        &db,
        ids.hunt,
        harbour,
        ("071000013", "Brave Hunt", 320, 1599, 2500, 10),
        &[author_castillo],
        &["Adventure"],
    )
    .await;
    insert_book_row(
        &db,
        ids.beagle,
        publisher,
        ("091000019", "The Loyal Beagle of Kingsmere", 180, 2000, 3000, 5),
        &[author_avery, author_brennan],
        &["Animals", "Adventure"],
    )
    .await;
    insert_book_row(
        &db,
        ids.long,
        publisher,
        ("021000021", "An Extraordinarily Long Title", 640, 4500, 1000, 0),
        &[author_avery],
        &["Mystery"],
    )
    .await;
    insert_book_row(
        &db,
        ids.cats,
        harbour,
        ("026009593", "Cats of the Harbour Quarter", 96, 1099, 3300, 2),
        &[author_brennan],
        &["Animals"],
    )
    .await;

    (db, ids)
}

/// Adds `count` books with ids from `first_id` upward, each written by
/// `author` and filed under `genre`. Titles are `Bulk Volume {id}`.
pub(crate) async fn insert_bulk_books(
    db: &Database,
    first_id: BookId,
    count: i64,
    publisher_id: PublisherId,
    author: AuthorId,
    genre: &str,
) {
    let last_id = first_id + count - 1;

    sqlx::query(
        r#"
        WITH RECURSIVE seq(n) AS (
            SELECT ?1
            UNION ALL
            SELECT n + 1 FROM seq WHERE n < ?2
        )
        INSERT INTO book (
            book_id, publisher_id, isbn, title, pages,
            price_cents, publisher_share_bps, stock
        )
        SELECT n, ?3, printf('%09d', n), 'Bulk Volume ' || n, 150, 800, 1000, 1
        FROM seq
        "#,
    )
    .bind(first_id)
    .bind(last_id)
    .bind(publisher_id)
    .execute(db.pool())
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO book_author (book_id, author_id) \
         SELECT book_id, ?1 FROM book WHERE book_id BETWEEN ?2 AND ?3",
    )
    .bind(author)
    .bind(first_id)
    .bind(last_id)
    .execute(db.pool())
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO book_genre (book_id, genre_name) \
         SELECT book_id, ?1 FROM book WHERE book_id BETWEEN ?2 AND ?3",
    )
    .bind(genre)
    .bind(first_id)
    .bind(last_id)
    .execute(db.pool())
    .await
    .unwrap();
}

/// Current stock of a book, read straight from the table.
pub(crate) async fn stock_of(db: &Database, id: BookId) -> i64 {
    sqlx::query_scalar("SELECT stock FROM book WHERE book_id = ?1")
        .bind(id)
        .fetch_one(db.pool())
        .await
        .unwrap()
}

/// Current banking balance of a publisher, in cents.
pub(crate) async fn balance_of(db: &Database, id: PublisherId) -> i64 {
    sqlx::query_scalar(
        "SELECT b.balance_cents FROM publisher p \
         JOIN publisher_banking b ON b.id = p.banking_id WHERE p.publisher_id = ?1",
    )
    .bind(id)
    .fetch_one(db.pool())
    .await
    .unwrap()
}

/// Sales counter of an author.
pub(crate) async fn author_sales(db: &Database, id: AuthorId) -> i64 {
    sqlx::query_scalar("SELECT sales FROM author WHERE id = ?1")
        .bind(id)
        .fetch_one(db.pool())
        .await
        .unwrap()
}

/// Sales counter of a genre.
pub(crate) async fn genre_sales(db: &Database, name: &str) -> i64 {
    sqlx::query_scalar("SELECT sales FROM genre WHERE name = ?1")
        .bind(name)
        .fetch_one(db.pool())
        .await
        .unwrap()
}

/// Number of rows in `orders`.
pub(crate) async fn order_count(db: &Database) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(db.pool())
        .await
        .unwrap()
}
