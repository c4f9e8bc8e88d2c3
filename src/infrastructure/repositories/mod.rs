pub mod json_file_store;
pub mod memory_store;
pub mod sqlite_store;

pub use json_file_store::JsonFileStore;
pub use memory_store::InMemoryStore;
pub use sqlite_store::SqliteStore;

use crate::domain::repositories::key_value_store::{KeyValueStore, Result};
use std::path::Path;
use std::sync::Arc;

/// Picks a backend from the file extension: `.db`, `.sqlite` and `.sqlite3`
/// open SQLite, anything else is a JSON file.
pub fn open_store(path: &Path) -> Result<Arc<dyn KeyValueStore>> {
    let is_sqlite = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext, "db" | "sqlite" | "sqlite3"));

    if is_sqlite {
        Ok(Arc::new(SqliteStore::open(path)?))
    } else {
        Ok(Arc::new(JsonFileStore::new(path)))
    }
}
