use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::repositories::key_value_store::{KeyValueStore, Result, StorageError};

/// In-memory implementation of KeyValueStore.
/// Useful for tests and for sessions that should not touch the disk.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
    read_only: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses every write, like a browser in a locked-down
    /// private mode
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(StorageError::Unavailable("store is read-only".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::Read("lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_writable()?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Write("lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.ensure_writable()?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Write("lock poisoned".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}
