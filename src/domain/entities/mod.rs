pub mod config;
pub mod target;

pub use config::{CONFIG_VERSION, Configuration, ValidConfig};
pub use target::{Progress, ProgressUnit, Target, TargetKind, Targets, TimeRemaining};
