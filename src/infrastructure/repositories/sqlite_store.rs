use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::domain::repositories::key_value_store::{KeyValueStore, Result, StorageError};

/// Key-value store backed by a single SQLite table.
pub struct SqliteStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens the SQLite DB and initializes the schema if needed.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::Unavailable(format!("Failed to create directory: {}", e))
            })?;
        }

        let connection = Connection::open(db_path)
            .map_err(|e| StorageError::Unavailable(format!("Failed to open SQLite DB: {}", e)))?;
        Self::with_connection(connection)
    }

    pub fn in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory()
            .map_err(|e| StorageError::Unavailable(format!("Failed to open SQLite DB: {}", e)))?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self> {
        connection
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS kv (
                    key    TEXT PRIMARY KEY,
                    value  TEXT NOT NULL
                );
                "#,
                [],
            )
            .map_err(|e| StorageError::Unavailable(format!("Failed to create kv table: {}", e)))?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn with_conn<T>(
        &self,
        operation: impl FnOnce(&Connection) -> rusqlite::Result<T>,
        on_error: fn(String) -> StorageError,
    ) -> Result<T> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| StorageError::Unavailable("connection lock poisoned".to_string()))?;
        operation(&conn).map_err(|e| on_error(e.to_string()))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(
            |conn| {
                conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                    row.get::<_, String>(0)
                })
                .optional()
            },
            StorageError::Read,
        )
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(
            |conn| {
                conn.execute(
                    r#"
                    INSERT INTO kv (key, value)
                    VALUES (?1, ?2)
                    ON CONFLICT(key)
                    DO UPDATE SET value = excluded.value
                    "#,
                    params![key, value],
                )
            },
            StorageError::Write,
        )
        .map(|_| ())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.with_conn(
            |conn| conn.execute("DELETE FROM kv WHERE key = ?1", params![key]),
            StorageError::Write,
        )
        .map(|_| ())
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_and_delete() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "first").unwrap();
        store.set("k", "second").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whilelasts.db");

        SqliteStore::open(&path).unwrap().set("k", "v").unwrap();
        assert_eq!(SqliteStore::open(&path).unwrap().get("k").unwrap().as_deref(), Some("v"));
    }
}
