use std::fmt::Debug;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read storage: {0}")]
    Read(String),
    #[error("failed to write storage: {0}")]
    Write(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// String-keyed persistence the app keeps its settings in.
///
/// Implementations may refuse any operation (quota, permissions, locked
/// database); callers treat persistence as best effort.
pub trait KeyValueStore: Send + Sync + Debug {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// Check if a value exists for `key`
    fn contains(&self, key: &str) -> Result<bool> {
        match self.get(key) {
            Ok(Some(_)) => Ok(true),
            Ok(None) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
