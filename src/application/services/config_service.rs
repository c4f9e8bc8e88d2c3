use crate::application::services::config_codec::{decode_config, encode_config};
use crate::application::services::config_storage::ConfigStorage;
use crate::application::services::validation::{ValidationError, field_errors, validate_config};
use crate::domain::entities::config::{Configuration, ValidConfig};
use crate::domain::repositories::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Query parameter carrying the share token
pub const TOKEN_PARAM: &str = "s";

/// Where the configuration for a session came from
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedConfig {
    FromUrl(ValidConfig),
    FromStorage(ValidConfig),
    /// Nothing usable; the user has to go through settings
    NeedsSettings,
}

impl ResolvedConfig {
    pub fn config(&self) -> Option<&ValidConfig> {
        match self {
            ResolvedConfig::FromUrl(config) | ResolvedConfig::FromStorage(config) => Some(config),
            ResolvedConfig::NeedsSettings => None,
        }
    }
}

/// Result of a successful settings submission
#[derive(Debug, Clone, PartialEq)]
pub struct SavedSettings {
    pub config: ValidConfig,
    pub token: String,
    /// `false` when the store refused the write; the token still works
    pub persisted: bool,
}

/// Decides which configuration a session runs with and handles settings
/// submissions.
#[derive(Clone, Debug)]
pub struct ConfigService {
    storage: ConfigStorage,
}

impl ConfigService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage: ConfigStorage::new(store),
        }
    }

    pub fn storage(&self) -> &ConfigStorage {
        &self.storage
    }

    /// A valid token wins over saved settings. An invalid one is ignored and
    /// the saved settings are used instead.
    pub fn resolve(&self, token: Option<&str>) -> ResolvedConfig {
        if let Some(token) = token.filter(|token| !token.trim().is_empty()) {
            match decode_config(token).map(|config| validate_config(&config)) {
                Some(Ok(config)) => {
                    debug!("Using configuration from share token");
                    return ResolvedConfig::FromUrl(config);
                }
                Some(Err(e)) => warn!("Ignoring share token: {}", e),
                None => warn!("Ignoring malformed share token"),
            }
        }

        match self.storage.load() {
            Some(config) => ResolvedConfig::FromStorage(config),
            None => ResolvedConfig::NeedsSettings,
        }
    }

    /// Validates a settings form, saves it and returns its share token.
    /// Every failing field is reported.
    pub fn submit_settings(
        &self,
        age_at_death: i64,
        birthday: &str,
        time_zone: &str,
    ) -> Result<SavedSettings, Vec<ValidationError>> {
        let config = Configuration::new(age_at_death, birthday.trim(), time_zone.trim());

        let errors = field_errors(&config);
        if !errors.is_empty() {
            return Err(errors);
        }
        let config = validate_config(&config).map_err(|e| vec![e])?;

        let persisted = self.storage.save(config.config());
        let token = encode_config(config.config());
        info!(persisted, "Settings saved");

        Ok(SavedSettings {
            config,
            token,
            persisted,
        })
    }

    /// Forgets the saved settings
    pub fn reset(&self) {
        self.storage.clear();
        info!("Saved settings cleared");
    }
}

/// `<base>/view?s=<token>`
pub fn share_url(base_url: &str, token: &str) -> String {
    format!(
        "{}/view?{}={}",
        base_url.trim_end_matches('/'),
        TOKEN_PARAM,
        token
    )
}

/// Accepts either a bare token or a pasted share link and returns the token
pub fn token_from_input(input: &str) -> Option<&str> {
    let input = input.trim();
    let Some((_, query)) = input.split_once('?') else {
        return Some(input).filter(|token| !token.is_empty());
    };

    query
        .split('#')
        .next()
        .unwrap_or_default()
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == TOKEN_PARAM)
        .map(|(_, value)| value)
        .filter(|token| !token.is_empty())
}
