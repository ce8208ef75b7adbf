//! # User Repository
//!
//! Terminal login. Passwords are stored and compared as plain text; the
//! store has no authentication hardening.

use sqlx::SqlitePool;
use tracing::{debug, info};

use bookstore_core::Role;

use crate::error::{DbError, DbResult};

#[derive(sqlx::FromRow)]
struct UserRow {
    is_owner: bool,
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Checks credentials.
    ///
    /// ## Returns
    /// * `Ok(Some(role))` - Which terminal the user may open
    /// * `Ok(None)` - Unknown user or wrong password
    pub async fn login(&self, user_id: &str, password: &str) -> DbResult<Option<Role>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT is_owner FROM users WHERE id = ?1 AND password = ?2",
        )
        .bind(user_id)
        .bind(password)
        .fetch_optional(&self.pool)
        .await?;

        let role = row.map(|r| Role::from_owner_flag(r.is_owner));
        match role {
            Some(role) => info!(user_id = %user_id, ?role, "Login succeeded"),
            None => debug!(user_id = %user_id, "Login rejected"),
        }
        Ok(role)
    }

    /// Adds a user.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` if the id is taken.
    pub async fn insert_user(&self, user_id: &str, password: &str, role: Role) -> DbResult<()> {
        debug!(user_id = %user_id, ?role, "Inserting user");

        sqlx::query("INSERT INTO users (id, password, is_owner) VALUES (?1, ?2, ?3)")
            .bind(user_id)
            .bind(password)
            .bind(role.is_owner())
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { field, .. } => DbError::duplicate(field, user_id),
                other => other,
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_login_roles() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        users.insert_user("owner1", "owner1", Role::Owner).await.unwrap();
        users.insert_user("cust1", "cust1", Role::Customer).await.unwrap();

        assert_eq!(users.login("owner1", "owner1").await.unwrap(), Some(Role::Owner));
        assert_eq!(users.login("cust1", "cust1").await.unwrap(), Some(Role::Customer));
        assert_eq!(users.login("cust1", "wrong").await.unwrap(), None);
        assert_eq!(users.login("nobody", "cust1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_user_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        users.insert_user("cust1", "a", Role::Customer).await.unwrap();
        let err = users.insert_user("cust1", "b", Role::Owner).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
