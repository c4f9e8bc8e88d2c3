use crate::application::utils::calendar::{
    add_years, anniversary, end_of_day, end_of_month, end_of_year, resolve_local, start_of_day,
    start_of_month, start_of_year, whole_days, whole_months, whole_years,
};
use crate::domain::clock::Clock;
use crate::domain::entities::config::ValidConfig;
use crate::domain::entities::target::{
    Progress, ProgressUnit, Target, TargetKind, Targets, TimeRemaining,
};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use chrono_tz::Tz;

/// Samples `clock` and expresses the instant in `time_zone`
pub fn current_instant_in_time_zone(clock: &dyn Clock, time_zone: &Tz) -> DateTime<Tz> {
    clock.now().with_timezone(time_zone)
}

/// Birthday + age-at-death calendar years, at local midnight
pub fn calculate_death_date(config: &ValidConfig) -> DateTime<Tz> {
    let years = i32::try_from(config.age_at_death()).unwrap_or(i32::MAX);
    let death_day = add_years(config.birthday(), years);
    resolve_local(&config.time_zone(), start_of_day(death_day))
}

/// First birthday midnight strictly after `now`.
///
/// A birthday starting exactly at `now` counts as already passed.
pub fn calculate_next_birthday(birthday: NaiveDate, now: &DateTime<Tz>) -> DateTime<Tz> {
    let tz = now.timezone();
    let this_year = now.date_naive().year();

    let candidate = birthday_midnight(&tz, birthday, this_year);
    if candidate <= *now {
        birthday_midnight(&tz, birthday, this_year + 1)
    } else {
        candidate
    }
}

/// Dec 31 23:59:59.999 of `now`'s year
pub fn calculate_end_of_year(now: &DateTime<Tz>) -> DateTime<Tz> {
    resolve_local(&now.timezone(), end_of_day(end_of_year(now.date_naive())))
}

/// 23:59:59.999 on the last day of `now`'s month
pub fn calculate_end_of_month(now: &DateTime<Tz>) -> DateTime<Tz> {
    resolve_local(&now.timezone(), end_of_day(end_of_month(now.date_naive())))
}

/// Independent whole-unit counts from `from` until `to`.
///
/// Calendar units (years, months, weeks, days) follow local wall-clock time;
/// hours and below are elapsed time.
pub fn calculate_time_remaining(from: &DateTime<Tz>, to: &DateTime<Tz>) -> TimeRemaining {
    let wall_from = from.naive_local();
    let wall_to = to.naive_local();
    let elapsed = to.signed_duration_since(from);
    let days = whole_days(wall_from, wall_to);

    TimeRemaining {
        years: whole_years(wall_from, wall_to),
        months: whole_months(wall_from, wall_to),
        weeks: days / 7,
        days,
        hours: elapsed.num_hours(),
        minutes: elapsed.num_minutes(),
        seconds: elapsed.num_seconds(),
    }
}

/// 1-based elapsed/total counts for a period, in `unit`
pub fn calculate_progress(
    start: &DateTime<Tz>,
    target: &DateTime<Tz>,
    now: &DateTime<Tz>,
    unit: ProgressUnit,
) -> Progress {
    Progress {
        elapsed: whole_units(start, now, unit) + 1,
        total: whole_units(start, target, unit) + 1,
        unit,
    }
}

/// Share of the period already elapsed, in percent, clamped to `[0, 100]`.
/// An empty or inverted period reads as complete.
pub fn progress_percent(start: &DateTime<Tz>, target: &DateTime<Tz>, now: &DateTime<Tz>) -> f64 {
    let period = target.signed_duration_since(start).num_milliseconds();
    if period <= 0 {
        return 100.0;
    }

    let elapsed = now.signed_duration_since(start).num_milliseconds();
    (elapsed as f64 / period as f64 * 100.0).clamp(0.0, 100.0)
}

/// Derives all four targets for `now`, which is re-expressed in the
/// configuration's zone before any calendar math.
pub fn calculate_all_targets<T: TimeZone>(config: &ValidConfig, now: &DateTime<T>) -> Targets {
    let tz = config.time_zone();
    let now = now.with_timezone(&tz);

    let lifespan_start = resolve_local(&tz, start_of_day(config.birthday()));
    let death_date = calculate_death_date(config);

    // the period runs from one calendar year before the next birthday
    let next_birthday = calculate_next_birthday(config.birthday(), &now);
    let previous_birthday = resolve_local(
        &tz,
        start_of_day(add_years(next_birthday.date_naive(), -1)),
    );

    let today = now.date_naive();
    let year_start = resolve_local(&tz, start_of_day(start_of_year(today)));
    let month_start = resolve_local(&tz, start_of_day(start_of_month(today)));

    Targets {
        lifespan: build_target(TargetKind::Lifespan, lifespan_start, death_date, &now),
        next_birthday: build_target(
            TargetKind::NextBirthday,
            previous_birthday,
            next_birthday,
            &now,
        ),
        end_of_year: build_target(
            TargetKind::EndOfYear,
            year_start,
            calculate_end_of_year(&now),
            &now,
        ),
        end_of_month: build_target(
            TargetKind::EndOfMonth,
            month_start,
            calculate_end_of_month(&now),
            &now,
        ),
    }
}

fn build_target(
    kind: TargetKind,
    start_date: DateTime<Tz>,
    target_date: DateTime<Tz>,
    now: &DateTime<Tz>,
) -> Target {
    Target {
        kind,
        remaining: calculate_time_remaining(now, &target_date),
        progress: calculate_progress(&start_date, &target_date, now, kind.progress_unit()),
        reached: target_date <= *now,
        start_date,
        target_date,
    }
}

fn birthday_midnight(tz: &Tz, birthday: NaiveDate, year: i32) -> DateTime<Tz> {
    resolve_local(tz, start_of_day(anniversary(birthday, year)))
}

fn whole_units(from: &DateTime<Tz>, to: &DateTime<Tz>, unit: ProgressUnit) -> i64 {
    let (from, to) = (from.naive_local(), to.naive_local());
    match unit {
        ProgressUnit::Years => whole_years(from, to),
        ProgressUnit::Months => whole_months(from, to),
        ProgressUnit::Days => whole_days(from, to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::validation::validate_config;
    use crate::domain::entities::config::Configuration;
    use crate::infrastructure::clock::FixedClock;
    use chrono::{NaiveDateTime, Utc};
    use chrono_tz::{America, Asia};

    fn valid(age: i64, birthday: &str, tz: &str) -> ValidConfig {
        validate_config(&Configuration::new(age, birthday, tz)).unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn tokyo(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Tz> {
        resolve_local(&Tz::Asia__Tokyo, local(y, m, d, h, min, s))
    }

    #[test]
    fn test_current_instant_uses_requested_zone() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 2, 9, 15, 0, 0).unwrap());
        let now = current_instant_in_time_zone(&clock, &Tz::Asia__Tokyo);
        assert_eq!(now.naive_local(), local(2025, 2, 10, 0, 0, 0));
    }

    #[test]
    fn test_death_date_adds_calendar_years() {
        let config = valid(80, "1990-06-15", "Asia/Tokyo");
        let death = calculate_death_date(&config);
        assert_eq!(death.naive_local(), local(2070, 6, 15, 0, 0, 0));
    }

    #[test]
    fn test_death_date_for_leap_day_birthday() {
        let leap_target = calculate_death_date(&valid(24, "2000-02-29", "UTC"));
        assert_eq!(leap_target.naive_local(), local(2024, 2, 29, 0, 0, 0));

        let common_target = calculate_death_date(&valid(23, "2000-02-29", "UTC"));
        assert_eq!(common_target.naive_local(), local(2023, 2, 28, 0, 0, 0));
    }

    #[test]
    fn test_next_birthday_later_this_year() {
        let birthday = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
        let next = calculate_next_birthday(birthday, &tokyo(2025, 2, 10, 12, 0, 0));
        assert_eq!(next.naive_local(), local(2025, 6, 15, 0, 0, 0));
    }

    #[test]
    fn test_next_birthday_tie_break_at_midnight() {
        let birthday = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
        let next = calculate_next_birthday(birthday, &tokyo(2025, 6, 15, 0, 0, 0));
        assert_eq!(next.naive_local(), local(2026, 6, 15, 0, 0, 0));
    }

    #[test]
    fn test_next_birthday_one_second_before() {
        let birthday = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
        let next = calculate_next_birthday(birthday, &tokyo(2025, 6, 14, 23, 59, 59));
        assert_eq!(next.naive_local(), local(2025, 6, 15, 0, 0, 0));
    }

    #[test]
    fn test_next_birthday_leap_day_in_common_year() {
        let birthday = NaiveDate::from_ymd_opt(2000, 2, 29).unwrap();
        let next = calculate_next_birthday(birthday, &tokyo(2025, 1, 10, 0, 0, 0));
        assert_eq!(next.naive_local(), local(2025, 2, 28, 0, 0, 0));

        let next = calculate_next_birthday(birthday, &tokyo(2027, 3, 1, 0, 0, 0));
        assert_eq!(next.naive_local(), local(2028, 2, 29, 0, 0, 0));
    }

    #[test]
    fn test_next_birthday_period_starts_one_year_before() {
        let config = valid(80, "2000-02-29", "UTC");
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let targets = calculate_all_targets(&config, &now);

        assert_eq!(targets.next_birthday.target_date.naive_local(), local(2025, 2, 28, 0, 0, 0));
        assert_eq!(targets.next_birthday.start_date.naive_local(), local(2024, 2, 28, 0, 0, 0));
        assert_eq!(targets.next_birthday.progress.total, 13);
    }

    #[test]
    fn test_end_of_month_non_leap_february() {
        let end = calculate_end_of_month(&tokyo(2025, 2, 10, 9, 30, 0));
        let expected = NaiveDate::from_ymd_opt(2025, 2, 28)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap();
        assert_eq!(end.naive_local(), expected);
    }

    #[test]
    fn test_end_of_year() {
        let end = calculate_end_of_year(&tokyo(2025, 2, 10, 9, 30, 0));
        let expected = NaiveDate::from_ymd_opt(2025, 12, 31)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap();
        assert_eq!(end.naive_local(), expected);
    }

    #[test]
    fn test_remaining_fields_are_independent() {
        let remaining =
            calculate_time_remaining(&tokyo(2025, 1, 1, 0, 0, 0), &tokyo(2026, 3, 1, 0, 0, 0));
        assert_eq!(remaining.years, 1);
        assert_eq!(remaining.months, 14);
        assert_eq!(remaining.days, 424);
        assert_eq!(remaining.weeks, 60);
        assert_eq!(remaining.hours, 424 * 24);
        assert_eq!(remaining.minutes, 424 * 24 * 60);
        assert_eq!(remaining.seconds, 424 * 24 * 60 * 60);
    }

    #[test]
    fn test_remaining_is_negative_once_passed() {
        let remaining =
            calculate_time_remaining(&tokyo(2025, 1, 2, 0, 0, 0), &tokyo(2025, 1, 1, 0, 0, 0));
        assert_eq!(remaining.days, -1);
        assert_eq!(remaining.hours, -24);
        assert_eq!(remaining.months, 0);
    }

    #[test]
    fn test_remaining_hours_follow_elapsed_time_across_dst() {
        let tz = America::New_York;
        let from = resolve_local(&tz, local(2025, 3, 8, 12, 0, 0));
        let to = resolve_local(&tz, local(2025, 3, 9, 12, 0, 0));
        let remaining = calculate_time_remaining(&from, &to);
        assert_eq!(remaining.days, 1);
        assert_eq!(remaining.hours, 23);
    }

    #[test]
    fn test_all_targets_periods() {
        let config = valid(80, "1990-06-15", "Asia/Tokyo");
        let now = tokyo(2025, 2, 10, 12, 0, 0);
        let targets = calculate_all_targets(&config, &now);

        assert_eq!(targets.lifespan.start_date.naive_local(), local(1990, 6, 15, 0, 0, 0));
        assert_eq!(targets.lifespan.target_date.naive_local(), local(2070, 6, 15, 0, 0, 0));
        assert_eq!(targets.lifespan.progress.elapsed, 35);
        assert_eq!(targets.lifespan.progress.total, 81);
        assert_eq!(targets.lifespan.progress.unit, ProgressUnit::Years);

        assert_eq!(targets.next_birthday.start_date.naive_local(), local(2024, 6, 15, 0, 0, 0));
        assert_eq!(targets.next_birthday.target_date.naive_local(), local(2025, 6, 15, 0, 0, 0));
        assert_eq!(targets.next_birthday.progress.elapsed, 8);
        assert_eq!(targets.next_birthday.progress.total, 13);

        assert_eq!(targets.end_of_year.start_date.naive_local(), local(2025, 1, 1, 0, 0, 0));
        assert_eq!(targets.end_of_year.progress.elapsed, 2);
        assert_eq!(targets.end_of_year.progress.total, 12);

        assert_eq!(targets.end_of_month.start_date.naive_local(), local(2025, 2, 1, 0, 0, 0));
        assert_eq!(targets.end_of_month.progress.elapsed, 10);
        assert_eq!(targets.end_of_month.progress.total, 28);
        assert_eq!(targets.end_of_month.progress.unit, ProgressUnit::Days);

        assert!(targets.iter().all(|target| !target.reached));
    }

    #[test]
    fn test_now_is_projected_into_config_zone() {
        // 2025-01-31T20:00Z is already February 1st in Tokyo
        let config = valid(80, "1990-06-15", "Asia/Tokyo");
        let now = Utc.with_ymd_and_hms(2025, 1, 31, 20, 0, 0).unwrap();
        let targets = calculate_all_targets(&config, &now);
        assert_eq!(targets.end_of_month.start_date.naive_local(), local(2025, 2, 1, 0, 0, 0));
        assert_eq!(targets.end_of_month.target_date.timezone(), Asia::Tokyo);
    }

    #[test]
    fn test_progress_is_one_based_at_period_start() {
        let config = valid(80, "1990-06-15", "Asia/Tokyo");
        let now = tokyo(2025, 2, 1, 0, 0, 0);
        let targets = calculate_all_targets(&config, &now);
        assert_eq!(targets.end_of_month.start_date, now);
        assert_eq!(targets.end_of_month.progress.elapsed, 1);
        assert_eq!(
            progress_percent(
                &targets.end_of_month.start_date,
                &targets.end_of_month.target_date,
                &now
            ),
            0.0
        );
    }

    #[test]
    fn test_lifespan_already_reached() {
        let config = valid(30, "1950-01-01", "UTC");
        let now = resolve_local(&Tz::UTC, local(2025, 2, 10, 0, 0, 0));
        let targets = calculate_all_targets(&config, &now);
        assert!(targets.lifespan.reached);
        assert!(targets.lifespan.remaining.years < 0);
    }

    #[test]
    fn test_progress_percent_monotonic_and_bounded() {
        let start = tokyo(2025, 1, 1, 0, 0, 0);
        let target = calculate_end_of_year(&start);

        let mut previous = -1.0;
        let mut now = start;
        while now <= target {
            let percent = progress_percent(&start, &target, &now);
            assert!((0.0..=100.0).contains(&percent));
            assert!(percent >= previous);
            previous = percent;
            now += chrono::Duration::days(7);
        }

        assert_eq!(progress_percent(&start, &target, &(target + chrono::Duration::days(1))), 100.0);
        assert_eq!(progress_percent(&start, &target, &(start - chrono::Duration::days(1))), 0.0);
    }

    #[test]
    fn test_progress_percent_empty_period_is_complete() {
        let instant = tokyo(2025, 1, 1, 0, 0, 0);
        assert_eq!(progress_percent(&instant, &instant, &instant), 100.0);
    }
}
