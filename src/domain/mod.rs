pub mod clock;
pub mod entities;
pub mod repositories;

pub use clock::Clock;
pub use entities::{Configuration, Progress, ProgressUnit, Target, TargetKind, Targets, TimeRemaining, ValidConfig};
pub use repositories::{KeyValueStore, StorageError};
