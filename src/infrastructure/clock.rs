use crate::domain::clock::Clock;
use chrono::{DateTime, Utc};

/// Reads the host's system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant. Used by tests and by `view --at` to
/// freeze the countdown at a chosen moment.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }

    /// Parses an RFC 3339 timestamp such as `2025-02-10T12:00:00+09:00`
    pub fn parse(timestamp: &str) -> Result<Self, chrono::ParseError> {
        let instant = DateTime::parse_from_rfc3339(timestamp)?;
        Ok(Self::new(instant.with_timezone(&Utc)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}
