use crate::application::services::validation::validate_config;
use crate::domain::entities::config::{Configuration, ValidConfig};
use crate::domain::repositories::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Key the settings are kept under
pub const STORAGE_KEY: &str = "whilelasts_config";

/// Best-effort persistence of the configuration on top of a key-value store.
///
/// Nothing here fails loudly: an unavailable store reads as "nothing saved"
/// and a refused write is reported as `false`.
#[derive(Clone, Debug)]
pub struct ConfigStorage {
    store: Arc<dyn KeyValueStore>,
}

impl ConfigStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Reads and validates the saved configuration.
    /// A stored value that does not parse or validate is deleted.
    pub fn load(&self) -> Option<ValidConfig> {
        let stored = match self.store.get(STORAGE_KEY) {
            Ok(Some(stored)) => stored,
            Ok(None) => return None,
            Err(e) => {
                warn!("Could not read saved configuration: {}", e);
                return None;
            }
        };

        let parsed: Configuration = match serde_json::from_str(&stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Discarding unreadable saved configuration: {}", e);
                self.clear();
                return None;
            }
        };

        match validate_config(&parsed) {
            Ok(valid) => {
                debug!("Loaded saved configuration");
                Some(valid)
            }
            Err(e) => {
                warn!("Discarding invalid saved configuration: {}", e);
                self.clear();
                None
            }
        }
    }

    /// Returns `false` when the store refused the write
    pub fn save(&self, config: &Configuration) -> bool {
        let json = match serde_json::to_string(config) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize configuration: {}", e);
                return false;
            }
        };

        match self.store.set(STORAGE_KEY, &json) {
            Ok(()) => {
                debug!("Saved configuration");
                true
            }
            Err(e) => {
                warn!("Failed to save configuration: {}", e);
                false
            }
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(STORAGE_KEY) {
            warn!("Failed to clear saved configuration: {}", e);
        }
    }
}
