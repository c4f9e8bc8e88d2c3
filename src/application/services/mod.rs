pub mod config_codec;
pub mod config_service;
pub mod config_storage;
pub mod time_calculator;
pub mod validation;

pub use config_service::{ConfigService, ResolvedConfig, SavedSettings};
pub use config_storage::ConfigStorage;
pub use validation::ValidationError;
