use chrono::{DateTime, Utc};

/// Source of "now". The calculator never reads the system time itself; the
/// host samples a clock and passes the instant in.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
