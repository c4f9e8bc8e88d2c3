use chrono::DateTime;
use chrono_tz::Tz;

/// The four countdown goals shown for a configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Lifespan,
    NextBirthday,
    EndOfYear,
    EndOfMonth,
}

impl TargetKind {
    pub const ALL: [TargetKind; 4] = [
        TargetKind::Lifespan,
        TargetKind::NextBirthday,
        TargetKind::EndOfYear,
        TargetKind::EndOfMonth,
    ];

    /// Unit in which progress through this target's period is counted
    pub fn progress_unit(self) -> ProgressUnit {
        match self {
            TargetKind::Lifespan => ProgressUnit::Years,
            TargetKind::NextBirthday | TargetKind::EndOfYear => ProgressUnit::Months,
            TargetKind::EndOfMonth => ProgressUnit::Days,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::Lifespan => "lifespan",
            TargetKind::NextBirthday => "nextBirthday",
            TargetKind::EndOfYear => "endOfYear",
            TargetKind::EndOfMonth => "endOfMonth",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressUnit {
    Years,
    Months,
    Days,
}

/// Whole-unit counts until a target.
///
/// Every field is an independent answer to "how many whole X until the
/// target", so `months` is not `years * 12` plus a remainder. Values go
/// negative once the target has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeRemaining {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// 1-based position within a target's period: day 1 of 28, month 3 of 12...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub elapsed: i64,
    pub total: i64,
    pub unit: ProgressUnit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub kind: TargetKind,
    pub start_date: DateTime<Tz>,
    pub target_date: DateTime<Tz>,
    pub remaining: TimeRemaining,
    pub progress: Progress,
    /// The target instant is at or before the instant this was computed for
    pub reached: bool,
}

/// Everything computed for one tick
#[derive(Debug, Clone, PartialEq)]
pub struct Targets {
    pub lifespan: Target,
    pub next_birthday: Target,
    pub end_of_year: Target,
    pub end_of_month: Target,
}

impl Targets {
    pub fn get(&self, kind: TargetKind) -> &Target {
        match kind {
            TargetKind::Lifespan => &self.lifespan,
            TargetKind::NextBirthday => &self.next_birthday,
            TargetKind::EndOfYear => &self.end_of_year,
            TargetKind::EndOfMonth => &self.end_of_month,
        }
    }

    /// Targets in display order
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        TargetKind::ALL.into_iter().map(move |kind| self.get(kind))
    }
}
