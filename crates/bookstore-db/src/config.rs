//! Store configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                       | Default          |
//! |--------------------------------|------------------|
//! | `BOOKSTORE_DB_PATH`            | `./bookstore.db` |
//! | `BOOKSTORE_DB_MAX_CONNECTIONS` | `5`              |
//! | `BOOKSTORE_ORDER_STATUS`       | `pending`        |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use bookstore_core::StatusPolicy;

use crate::error::{DbError, DbResult};
use crate::pool::DbConfig;

pub const ENV_DB_PATH: &str = "BOOKSTORE_DB_PATH";
pub const ENV_DB_MAX_CONNECTIONS: &str = "BOOKSTORE_DB_MAX_CONNECTIONS";
pub const ENV_ORDER_STATUS: &str = "BOOKSTORE_ORDER_STATUS";

/// Process-level settings for a terminal or the seed binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file.
    pub database_path: PathBuf,

    /// Pool size.
    pub max_connections: u32,

    /// Initial status of new orders.
    pub order_status: StatusPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            database_path: PathBuf::from("./bookstore.db"),
            max_connections: 5,
            order_status: StatusPolicy::Pending,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> DbResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (the environment, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> DbResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = StoreConfig::default();
        let invalid =
            |key: &str, reason: String| DbError::InvalidConfig(format!("{key}: {reason}"));

        let database_path = lookup(ENV_DB_PATH)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let max_connections = match lookup(ENV_DB_MAX_CONNECTIONS) {
            Some(raw) => {
                let n: u32 = raw.trim().parse().map_err(|_| {
                    invalid(ENV_DB_MAX_CONNECTIONS, format!("'{raw}' is not a number"))
                })?;
                if n == 0 {
                    return Err(invalid(ENV_DB_MAX_CONNECTIONS, "must be at least 1".to_string()));
                }
                n
            }
            None => defaults.max_connections,
        };

        let order_status = match lookup(ENV_ORDER_STATUS) {
            Some(raw) => raw
                .parse::<StatusPolicy>()
                .map_err(|e| invalid(ENV_ORDER_STATUS, e.to_string()))?,
            None => defaults.order_status,
        };

        Ok(StoreConfig {
            database_path,
            max_connections,
            order_status,
        })
    }

    /// Pool configuration for this store.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone()).max_connections(self.max_connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.order_status, StatusPolicy::Pending);
    }

    #[test]
    fn test_reads_every_variable() {
        let config = StoreConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/tmp/shop.db"),
            (ENV_DB_MAX_CONNECTIONS, "3"),
            (ENV_ORDER_STATUS, "uniform"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/shop.db"));
        assert_eq!(config.max_connections, 3);
        assert_eq!(config.order_status, StatusPolicy::Uniform);

        let db = config.db_config();
        assert_eq!(db.max_connections, 3);
        assert_eq!(db.database_path, PathBuf::from("/tmp/shop.db"));
    }

    #[test]
    fn test_rejects_bad_values() {
        let err =
            StoreConfig::from_lookup(lookup(&[(ENV_DB_MAX_CONNECTIONS, "lots")])).unwrap_err();
        assert!(matches!(err, DbError::InvalidConfig(_)));

        let err = StoreConfig::from_lookup(lookup(&[(ENV_DB_MAX_CONNECTIONS, "0")])).unwrap_err();
        assert!(matches!(err, DbError::InvalidConfig(_)));

        let err = StoreConfig::from_lookup(lookup(&[(ENV_ORDER_STATUS, "random")])).unwrap_err();
        assert!(err.to_string().contains(ENV_ORDER_STATUS));
    }
}
