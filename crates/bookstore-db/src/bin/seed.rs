//! # Seed Data Generator
//!
//! Populates the database with deterministic demo data for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./bookstore.db (or $BOOKSTORE_DB_PATH)
//! cargo run -p bookstore-db --bin seed
//!
//! # Specify database path
//! cargo run -p bookstore-db --bin seed -- --db ./data/bookstore.db
//! ```
//!
//! ## Generated Data
//! The RNG is seeded with a fixed value, so every run against an empty
//! database produces the same store:
//! - 4 users: `owner1`, `owner2` (owners), `cust1`, `cust2` (customers);
//!   each password equals the user id
//! - 10 postal codes shared by 15 publishers
//! - 20 authors and 20 genres
//! - 20 books titled `{adjective} {breed}`, each with one author and genre
//! - 2 orders placed through the order committer, with random statuses

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bookstore_core::{
    AuthorId, Basket, NewBook, NewPublisher, PublisherId, Role, StatusPolicy, MAX_TITLE_LEN,
};
use bookstore_db::{Database, DbError, StoreConfig};

const SEED: u64 = 3005;

const USERS: &[(&str, Role)] = &[
    ("owner1", Role::Owner),
    ("owner2", Role::Owner),
    ("cust1", Role::Customer),
    ("cust2", Role::Customer),
];

/// (city, province) pairs for postal codes.
const CITIES: &[(&str, &str)] = &[
    ("Ottawa", "ON"),
    ("Toronto", "ON"),
    ("Kingston", "ON"),
    ("Montreal", "QC"),
    ("Quebec City", "QC"),
    ("Halifax", "NS"),
    ("Winnipeg", "MB"),
    ("Regina", "SK"),
    ("Calgary", "AB"),
    ("Victoria", "BC"),
];

const PUBLISHER_WORDS: &[&str] = &[
    "Maple", "Harbour", "Northern", "Granite", "Prairie", "Cedar", "Lantern", "Tidewater",
    "Birch", "Summit",
];

const PUBLISHER_SUFFIXES: &[&str] = &["Press", "Books", "House", "Publishing", "& Sons"];

const STREETS: &[&str] = &[
    "Sussex Drive",
    "Bank Street",
    "Elgin Street",
    "Rideau Street",
    "King Street West",
    "Water Street",
    "Main Street",
    "Wellington Street",
];

const FIRST_NAMES: &[&str] = &[
    "Ann", "Bo", "Cy", "Dana", "Eli", "Fern", "Gus", "Hana", "Ivo", "June",
];

const LAST_NAMES: &[&str] = &[
    "Avery", "Brennan", "Castillo", "Dubois", "Ellison", "Fraser", "Gagnon", "Hughes",
    "Iqbal", "Jensen",
];

const GENRES: &[&str] = &[
    "Adventure", "Animals", "Biography", "Comedy", "Cooking", "Crime", "Drama", "Fantasy",
    "History", "Horror", "Mystery", "Poetry", "Romance", "Science", "Sports", "Thriller",
    "Travel", "Western", "Youth", "Nature",
];

const ADJECTIVES: &[&str] = &[
    "Brave", "Quiet", "Loyal", "Small", "Rustic", "Gentle", "Clever", "Handsome",
    "Fantastic", "Sleek", "Awesome", "Tasty",
];

const BREEDS: &[&str] = &[
    "Beagle", "Collie", "Poodle", "Husky", "Terrier", "Dalmatian", "Greyhound", "Retriever",
    "Spaniel", "Boxer", "Corgi", "Whippet",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut config = StoreConfig::from_env()?;

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bookstore Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path");
                println!("                     (default: $BOOKSTORE_DB_PATH or ./bookstore.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Bookstore Seed Data Generator");
    println!("=============================");
    println!("Database: {}", config.database_path.display());
    println!();

    let db = Database::new(config.db_config()).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.catalog().count_books().await?;
    if existing > 0 {
        println!("⚠ Database already has {} books", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut rng = StdRng::seed_from_u64(SEED);

    seed(&db, &mut rng).await?;

    println!();
    println!("✓ Seed complete in {:?}", start.elapsed());

    db.close().await;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: INFO, with debug for the bookstore crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bookstore=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn seed(db: &Database, rng: &mut StdRng) -> Result<(), DbError> {
    for (id, role) in USERS {
        db.users().insert_user(id, id, *role).await?;
    }
    println!("  [{}] users", USERS.len());

    let postal_codes: Vec<(String, &str, &str)> = CITIES
        .iter()
        .map(|(city, province)| (postal_code(rng), *city, *province))
        .collect();

    let mut publishers: Vec<PublisherId> = Vec::with_capacity(15);
    for _ in 0..15 {
        let (code, city, province) = &postal_codes[rng.gen_range(0..postal_codes.len())];
        let publisher = NewPublisher {
            name: pick_two(rng, PUBLISHER_WORDS, PUBLISHER_SUFFIXES),
            phone_number: format!(
                "{}-555-{:04}",
                rng.gen_range(200..=999),
                rng.gen_range(0..10_000)
            ),
            street_number: rng.gen_range(1..=999).to_string(),
            street_name: pick(rng, STREETS).to_string(),
            apt_number: Some(rng.gen_range(101..=999)),
            postal_code: code.clone(),
            city: city.to_string(),
            province: province.to_string(),
        };
        publishers.push(db.publishers().insert_publisher(&publisher).await?);
    }
    println!("  [{}] publishers over {} postal codes", publishers.len(), postal_codes.len());

    let catalog = db.catalog();

    let mut authors: Vec<AuthorId> = Vec::with_capacity(20);
    for _ in 0..20 {
        let name = pick_two(rng, FIRST_NAMES, LAST_NAMES);
        authors.push(catalog.insert_author(&name).await?);
    }
    println!("  [{}] authors", authors.len());

    for genre in GENRES {
        catalog.insert_genre(genre).await?;
    }
    println!("  [{}] genres", GENRES.len());

    let mut books = Vec::with_capacity(20);
    for _ in 0..20 {
        let mut title = pick_two(rng, ADJECTIVES, BREEDS);
        title.truncate(MAX_TITLE_LEN);

        let book = NewBook {
            publisher_id: *pick(rng, &publishers),
            isbn: format!("{:09}", rng.gen_range(10_000_000..1_000_000_000)),
            title,
            pages: rng.gen_range(80..=1200),
            price_cents: rng.gen_range(500..=120_000),
            publisher_share_bps: rng.gen_range(0..=50) * 100,
            stock: rng.gen_range(10..=50),
            author_ids: vec![*pick(rng, &authors)],
            genres: vec![pick(rng, GENRES).to_string()],
        };
        books.push(catalog.insert_book(&book).await?);
    }
    println!("  [{}] books", books.len());

    let committer = db.committer(StatusPolicy::Uniform);
    for _ in 0..2 {
        let mut basket = Basket::new();
        basket.add(*pick(rng, &books), rng.gen_range(1..=20));

        let billing = format!("{}, {}", pick(rng, CITIES).0, pick(rng, CITIES).1);
        let shipping = format!("{}, {}", pick(rng, CITIES).0, pick(rng, CITIES).1);
        let receipt = committer
            .commit_with_rng(&mut basket, &billing, &shipping, rng)
            .await?;
        info!(
            order_num = receipt.order.order_num(),
            status = %receipt.order.status(),
            "Sample order placed"
        );
    }
    println!("  [2] orders");

    Ok(())
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    // Every list above is non-empty.
    &items[rng.gen_range(0..items.len())]
}

fn pick_two(rng: &mut StdRng, first: &[&str], second: &[&str]) -> String {
    format!("{} {}", pick(rng, first), pick(rng, second))
}

/// A Canadian-style postal code, e.g. `K1A0B1`.
fn postal_code(rng: &mut StdRng) -> String {
    const LETTERS: &[u8] = b"ABCEGHJKLMNPRSTVXY";
    let letter = |rng: &mut StdRng| *LETTERS.choose(rng).unwrap_or(&b'K') as char;

    format!(
        "{}{}{}{}{}{}",
        letter(rng),
        rng.gen_range(0..10),
        letter(rng),
        rng.gen_range(0..10),
        letter(rng),
        rng.gen_range(0..10),
    )
}
