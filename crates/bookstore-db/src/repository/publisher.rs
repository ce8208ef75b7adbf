//! # Publisher Repository
//!
//! Publisher listing (through the `publisher_info` view) and registration.
//!
//! ## Registration Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert_publisher(new)           one transaction                        │
//! │                                                                         │
//! │  publisher_banking   ◄── balance 0                                      │
//! │  publisher_phone     ◄── phone number                                   │
//! │  postal_code_location◄── upsert (city, province)                        │
//! │  publisher_address   ◄── street, apt, postal code                       │
//! │  publisher           ◄── name + the three ids above                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info};

use bookstore_core::{NewPublisher, PublisherId, PublisherInfo};

use crate::error::DbResult;

/// Repository for publisher database operations.
#[derive(Debug, Clone)]
pub struct PublisherRepository {
    pool: SqlitePool,
}

const PUBLISHER_INFO_COLUMNS: &str = r#"
    SELECT
        publisher_id,
        name,
        phone_number,
        apt_number,
        street_number,
        street_name,
        city,
        province,
        postal_code,
        balance_cents
    FROM publisher_info
"#;

impl PublisherRepository {
    /// Creates a new PublisherRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PublisherRepository { pool }
    }

    /// Lists every publisher with contact details and balance, by id.
    pub async fn list_publishers(&self) -> DbResult<Vec<PublisherInfo>> {
        debug!("Listing publishers");

        let sql = format!("{PUBLISHER_INFO_COLUMNS} ORDER BY publisher_id");
        let publishers = sqlx::query_as::<_, PublisherInfo>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(publishers)
    }

    /// Gets one publisher, or `None` if the id is unknown.
    pub async fn get_publisher(&self, id: PublisherId) -> DbResult<Option<PublisherInfo>> {
        let sql = format!("{PUBLISHER_INFO_COLUMNS} WHERE publisher_id = ?1");
        let publisher = sqlx::query_as::<_, PublisherInfo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(publisher)
    }

    /// Registers a publisher with a zero banking balance.
    ///
    /// An existing postal code has its city and province overwritten.
    pub async fn insert_publisher(&self, publisher: &NewPublisher) -> DbResult<PublisherId> {
        debug!(name = %publisher.name, "Inserting publisher");

        let mut tx = self.pool.begin().await?;

        let banking_id = sqlx::query("INSERT INTO publisher_banking (balance_cents) VALUES (0)")
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        let phone_id = sqlx::query("INSERT INTO publisher_phone (phone_number) VALUES (?1)")
            .bind(&publisher.phone_number)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        sqlx::query(
            r#"
            INSERT INTO postal_code_location (postal_code, city, province)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (postal_code) DO UPDATE SET
                city = excluded.city,
                province = excluded.province
            "#,
        )
        .bind(&publisher.postal_code)
        .bind(&publisher.city)
        .bind(&publisher.province)
        .execute(&mut *tx)
        .await?;

        let address_id = sqlx::query(
            r#"
            INSERT INTO publisher_address (postal_code, street_number, street_name, apt_number)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&publisher.postal_code)
        .bind(&publisher.street_number)
        .bind(&publisher.street_name)
        .bind(publisher.apt_number)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let publisher_id = sqlx::query(
            r#"
            INSERT INTO publisher (banking_id, address_id, phone_id, name)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(banking_id)
        .bind(address_id)
        .bind(phone_id)
        .bind(&publisher.name)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        info!(publisher_id, name = %publisher.name, "Publisher registered");
        Ok(publisher_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fixture, new_publisher};

    #[tokio::test]
    async fn test_list_publishers_from_view() {
        let (db, ids) = fixture().await;

        let publishers = db.publishers().list_publishers().await.unwrap();
        assert_eq!(publishers.len(), 2);
        assert_eq!(publishers[0].publisher_id, ids.publisher);
        assert_eq!(publishers[0].name, "Maple Leaf Press");
        assert_eq!(publishers[0].city, "Ottawa");
        assert_eq!(publishers[0].street_name, "Sussex Drive");
        assert_eq!(publishers[0].apt_number, None);
        assert_eq!(publishers[0].balance_cents, 0);
        assert_eq!(publishers[1].publisher_id, ids.harbour);
    }

    #[tokio::test]
    async fn test_insert_publisher_upserts_postal_code() {
        let (db, _) = fixture().await;

        let mut moved = new_publisher("Prairie House", "K1A0B1");
        moved.city = "Gatineau".to_string();
        moved.province = "QC".to_string();
        moved.apt_number = Some(4);
        let id = db.publishers().insert_publisher(&moved).await.unwrap();

        let info = db.publishers().get_publisher(id).await.unwrap().unwrap();
        assert_eq!(info.name, "Prairie House");
        assert_eq!(info.city, "Gatineau");
        assert_eq!(info.apt_number, Some(4));

        // Same postal code, so the earlier publishers now read the new city too.
        let all = db.publishers().list_publishers().await.unwrap();
        assert!(all.iter().all(|p| p.city == "Gatineau"));
    }

    #[tokio::test]
    async fn test_get_publisher_unknown_is_none() {
        let (db, _) = fixture().await;
        assert!(db.publishers().get_publisher(404).await.unwrap().is_none());
    }
}
