use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::warn;

use crate::domain::repositories::key_value_store::{KeyValueStore, Result, StorageError};

/// Key-value store persisted as a single JSON object in a file.
///
/// The whole map is rewritten on every change; the file only ever holds a
/// handful of small entries.
pub struct JsonFileStore {
    file_path: PathBuf,
    data: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Opens the store. A missing file is an empty store; an unreadable one
    /// is logged and treated as empty, and is replaced on the next write.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        let data = Self::load_data(&file_path).unwrap_or_else(|e| {
            warn!("Starting with an empty store: {}", e);
            BTreeMap::new()
        });

        Self {
            file_path,
            data: RwLock::new(data),
        }
    }

    fn load_data(file_path: &Path) -> Result<BTreeMap<String, String>> {
        if !file_path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(file_path)
            .map_err(|e| StorageError::Read(format!("Failed to read file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| StorageError::Read(format!("Failed to parse JSON: {}", e)))
    }

    fn save_data(&self, data: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| StorageError::Write(format!("Failed to serialize JSON: {}", e)))?;

        // create directory
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::Write(format!("Failed to create directory: {}", e))
            })?;
        }

        fs::write(&self.file_path, json)
            .map_err(|e| StorageError::Write(format!("Failed to write file: {}", e)))
    }

    fn update<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut data = self
            .data
            .write()
            .map_err(|_| StorageError::Write("lock poisoned".to_string()))?;

        let mut updated = data.clone();
        change(&mut updated);
        self.save_data(&updated)?;

        // only keep the change in memory once it is on disk
        *data = updated;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let data = self
            .data
            .read()
            .map_err(|_| StorageError::Read("lock poisoned".to_string()))?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|data| {
            data.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.contains(key)? {
            return Ok(());
        }
        self.update(|data| {
            data.remove(key);
        })
    }
}

impl std::fmt::Debug for JsonFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("file_path", &self.file_path)
            .finish()
    }
}
