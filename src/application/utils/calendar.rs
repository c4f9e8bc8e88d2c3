//! Calendar arithmetic on local wall-clock time.
//!
//! chrono has month addition but no whole-unit calendar difference, so the
//! differences are built here on top of `checked_add_months`. All of them are
//! computed on naive local times: a zone's DST shifts never turn "one month"
//! into "one month minus an hour".

use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone,
};
use chrono_tz::Tz;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Quarter-hour probes cover even a whole skipped day (Pacific/Apia, 2011)
const GAP_PROBE_MINUTES: i64 = 15;
const GAP_PROBE_STEPS: usize = 24 * 4 + 4;

/// Adds calendar years. Feb 29 in a non-leap target year clamps to Feb 28.
/// Saturates at chrono's supported range instead of failing.
pub fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    let months = years.unsigned_abs().saturating_mul(12);
    let shifted = if years >= 0 {
        date.checked_add_months(Months::new(months))
    } else {
        date.checked_sub_months(Months::new(months))
    };

    shifted.unwrap_or(if years >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

/// The birthday's anniversary falling in `year`
pub fn anniversary(birthday: NaiveDate, year: i32) -> NaiveDate {
    add_years(birthday, year - birthday.year())
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(date.day0())))
        .unwrap_or(NaiveDate::MIN)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    start_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next_month| next_month.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(date.ordinal0())))
        .unwrap_or(NaiveDate::MIN)
}

pub fn end_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(NaiveDate::MAX)
}

/// 00:00:00.000 on `date`
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 on `date`
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::milliseconds(MILLIS_PER_DAY - 1)
}

/// Pins a wall-clock time to an instant in `tz`.
///
/// Ambiguous times (clocks turned back) take the earlier instant. Times
/// skipped by a forward transition move to the first valid local time after
/// the gap.
pub fn resolve_local(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(instant) => instant,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let mut probe = local;
            for _ in 0..GAP_PROBE_STEPS {
                probe += Duration::minutes(GAP_PROBE_MINUTES);
                if let Some(instant) = tz.from_local_datetime(&probe).earliest() {
                    return instant;
                }
            }
            tz.from_utc_datetime(&local)
        }
    }
}

/// Largest `n` such that `from + n months <= to` (negated when `to < from`)
pub fn whole_months(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    if to < from {
        return -whole_months(to, from);
    }

    let calendar_months =
        i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month());

    let reaches = u32::try_from(calendar_months)
        .ok()
        .and_then(|months| from.checked_add_months(Months::new(months)))
        .is_some_and(|candidate| candidate <= to);

    if reaches {
        calendar_months
    } else {
        calendar_months - 1
    }
}

pub fn whole_years(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    whole_months(from, to) / 12
}

/// Whole 24-hour wall-clock days between the two times
pub fn whole_days(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use chrono_tz::{America, Asia};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, s).unwrap()
    }

    #[test]
    fn test_add_years_keeps_month_and_day() {
        assert_eq!(add_years(date(1990, 6, 15), 80), date(2070, 6, 15));
        assert_eq!(add_years(date(1990, 6, 15), -5), date(1985, 6, 15));
    }

    #[test]
    fn test_add_years_leap_day_clamps_to_feb_28() {
        assert_eq!(add_years(date(2000, 2, 29), 24), date(2024, 2, 29));
        assert_eq!(add_years(date(2000, 2, 29), 23), date(2023, 2, 28));
        assert_eq!(add_years(date(2000, 2, 29), 100), date(2100, 2, 28));
    }

    #[test]
    fn test_anniversary_of_leap_day() {
        assert_eq!(anniversary(date(2000, 2, 29), 2025), date(2025, 2, 28));
        assert_eq!(anniversary(date(2000, 2, 29), 2028), date(2028, 2, 29));
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(start_of_month(date(2025, 2, 10)), date(2025, 2, 1));
        assert_eq!(end_of_month(date(2025, 2, 10)), date(2025, 2, 28));
        assert_eq!(end_of_month(date(2024, 2, 1)), date(2024, 2, 29));
        assert_eq!(end_of_month(date(2025, 12, 31)), date(2025, 12, 31));
        assert_eq!(end_of_month(date(2025, 4, 30)), date(2025, 4, 30));
    }

    #[test]
    fn test_year_bounds() {
        assert_eq!(start_of_year(date(2024, 12, 31)), date(2024, 1, 1));
        assert_eq!(end_of_year(date(2024, 1, 1)), date(2024, 12, 31));
    }

    #[test]
    fn test_end_of_day_is_last_millisecond() {
        let end = end_of_day(date(2025, 2, 28));
        assert_eq!(end.hour(), 23);
        assert_eq!(end.minute(), 59);
        assert_eq!(end.second(), 59);
        assert_eq!(end.nanosecond(), 999_000_000);
    }

    #[test]
    fn test_whole_months_requires_full_month() {
        assert_eq!(whole_months(at(2025, 1, 15, 0, 0, 0), at(2025, 2, 15, 0, 0, 0)), 1);
        assert_eq!(whole_months(at(2025, 1, 15, 0, 0, 1), at(2025, 2, 15, 0, 0, 0)), 0);
        assert_eq!(whole_months(at(2025, 1, 1, 0, 0, 0), at(2025, 12, 31, 23, 59, 59)), 11);
        assert_eq!(whole_months(at(2025, 2, 15, 0, 0, 0), at(2025, 1, 15, 0, 0, 0)), -1);
    }

    #[test]
    fn test_whole_months_from_month_end() {
        // Jan 31 + 1 month clamps to Feb 28, which has been reached
        assert_eq!(whole_months(at(2025, 1, 31, 0, 0, 0), at(2025, 2, 28, 0, 0, 0)), 1);
        assert_eq!(whole_months(at(2025, 1, 31, 0, 0, 0), at(2025, 2, 27, 23, 0, 0)), 0);
    }

    #[test]
    fn test_whole_years_and_days() {
        assert_eq!(whole_years(at(1990, 6, 15, 0, 0, 0), at(2025, 6, 14, 23, 59, 59)), 34);
        assert_eq!(whole_years(at(1990, 6, 15, 0, 0, 0), at(2025, 6, 15, 0, 0, 0)), 35);
        assert_eq!(whole_days(at(2025, 2, 1, 0, 0, 0), at(2025, 2, 28, 23, 59, 59)), 27);
        assert_eq!(whole_days(at(2025, 2, 2, 12, 0, 0), at(2025, 2, 1, 0, 0, 0)), -1);
    }

    #[test]
    fn test_resolve_local_plain_time() {
        let instant = resolve_local(&Asia::Tokyo, at(2025, 2, 10, 0, 0, 0));
        assert_eq!(instant.naive_local(), at(2025, 2, 10, 0, 0, 0));
    }

    #[test]
    fn test_resolve_local_skips_forward_gap() {
        // 2025-03-09 02:30 does not exist in New York
        let instant = resolve_local(&America::New_York, at(2025, 3, 9, 2, 30, 0));
        assert_eq!(instant.naive_local(), at(2025, 3, 9, 3, 0, 0));
    }

    #[test]
    fn test_resolve_local_ambiguous_takes_earliest() {
        // 01:30 happens twice on 2025-11-02 in New York; the first is EDT (UTC-4)
        let instant = resolve_local(&America::New_York, at(2025, 11, 2, 1, 30, 0));
        assert_eq!(instant.naive_utc(), at(2025, 11, 2, 5, 30, 0));
    }
}
