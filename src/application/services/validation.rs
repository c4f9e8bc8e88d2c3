use crate::domain::entities::config::{CONFIG_VERSION, Configuration, ValidConfig};
use chrono::NaiveDate;
use chrono_tz::Tz;

pub const MIN_AGE_AT_DEATH: i64 = 1;
pub const MAX_AGE_AT_DEATH: i64 = 150;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unsupported config version: {0}")]
    UnsupportedVersion(u32),
    #[error("age at death must be an integer between 1 and 150, got {0}")]
    AgeOutOfRange(i64),
    #[error("invalid birthday: {0:?} (expected a real YYYY-MM-DD date)")]
    InvalidBirthday(String),
    #[error("unknown time zone: {0:?}")]
    UnknownTimeZone(String),
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Checks every field; a configuration is accepted only when all of them pass.
///
/// Run this on every load path. Decoded tokens and stored values are only
/// structurally checked and may carry anything.
pub fn validate_config(config: &Configuration) -> Result<ValidConfig> {
    if config.version != CONFIG_VERSION {
        return Err(ValidationError::UnsupportedVersion(config.version));
    }

    let age_at_death = u32::try_from(config.age_at_death)
        .ok()
        .filter(|_| validate_age(config.age_at_death))
        .ok_or(ValidationError::AgeOutOfRange(config.age_at_death))?;

    let birthday = parse_birthday(&config.birthday)
        .ok_or_else(|| ValidationError::InvalidBirthday(config.birthday.clone()))?;

    let time_zone = resolve_time_zone(&config.time_zone)
        .ok_or_else(|| ValidationError::UnknownTimeZone(config.time_zone.clone()))?;

    Ok(ValidConfig::new(config.clone(), age_at_death, birthday, time_zone))
}

/// Every failing field of `config`, in field order
pub fn field_errors(config: &Configuration) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.version != CONFIG_VERSION {
        errors.push(ValidationError::UnsupportedVersion(config.version));
    }
    if !validate_age(config.age_at_death) {
        errors.push(ValidationError::AgeOutOfRange(config.age_at_death));
    }
    if !validate_birthday(&config.birthday) {
        errors.push(ValidationError::InvalidBirthday(config.birthday.clone()));
    }
    if !validate_time_zone(&config.time_zone) {
        errors.push(ValidationError::UnknownTimeZone(config.time_zone.clone()));
    }

    errors
}

pub fn validate_age(age: i64) -> bool {
    (MIN_AGE_AT_DEATH..=MAX_AGE_AT_DEATH).contains(&age)
}

pub fn validate_birthday(birthday: &str) -> bool {
    parse_birthday(birthday).is_some()
}

pub fn validate_time_zone(time_zone: &str) -> bool {
    resolve_time_zone(time_zone).is_some()
}

/// Parses strict `YYYY-MM-DD`; the date must exist on the Gregorian calendar
pub fn parse_birthday(birthday: &str) -> Option<NaiveDate> {
    let bytes = birthday.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }

    let year = birthday[0..4].parse().ok()?;
    let month = birthday[5..7].parse().ok()?;
    let day = birthday[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Looks up an IANA zone name in the bundled tz database
pub fn resolve_time_zone(time_zone: &str) -> Option<Tz> {
    time_zone.parse::<Tz>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(age: i64, birthday: &str, tz: &str) -> Configuration {
        Configuration::new(age, birthday, tz)
    }

    #[test]
    fn test_valid_config() {
        let valid = validate_config(&config(80, "1990-06-15", "Asia/Tokyo")).unwrap();
        assert_eq!(valid.age_at_death(), 80);
        assert_eq!(valid.birthday(), NaiveDate::from_ymd_opt(1990, 6, 15).unwrap());
        assert_eq!(valid.time_zone(), Tz::Asia__Tokyo);
        assert_eq!(valid.config(), &config(80, "1990-06-15", "Asia/Tokyo"));
    }

    #[test]
    fn test_age_bounds() {
        assert!(validate_age(1));
        assert!(validate_age(150));
        assert!(!validate_age(0));
        assert!(!validate_age(151));
        assert!(!validate_age(-3));

        assert!(validate_config(&config(1, "2000-01-01", "UTC")).is_ok());
        assert!(validate_config(&config(150, "2000-01-01", "UTC")).is_ok());
        assert_eq!(
            validate_config(&config(0, "2000-01-01", "UTC")),
            Err(ValidationError::AgeOutOfRange(0))
        );
        assert_eq!(
            validate_config(&config(151, "2000-01-01", "UTC")),
            Err(ValidationError::AgeOutOfRange(151))
        );
    }

    #[test]
    fn test_rejects_impossible_date() {
        assert!(!validate_birthday("2023-02-30"));
        assert!(!validate_birthday("2023-02-29"));
        assert!(validate_birthday("2024-02-29"));
        assert!(!validate_birthday("2023-13-01"));
        assert!(matches!(
            validate_config(&config(80, "2023-02-30", "UTC")),
            Err(ValidationError::InvalidBirthday(_))
        ));
    }

    #[test]
    fn test_rejects_loose_date_formats() {
        assert!(!validate_birthday("1990-6-15"));
        assert!(!validate_birthday("1990/06/15"));
        assert!(!validate_birthday("1990-06-15T00:00"));
        assert!(!validate_birthday("+990-06-15"));
        assert!(!validate_birthday(""));
    }

    #[test]
    fn test_time_zone_must_resolve() {
        assert!(validate_time_zone("Europe/London"));
        assert!(validate_time_zone("UTC"));
        assert!(!validate_time_zone("Mars/Olympus_Mons"));
        assert!(!validate_time_zone(""));
    }

    #[test]
    fn test_rejects_other_versions() {
        let mut future = config(80, "2000-01-01", "UTC");
        future.version = 2;
        assert_eq!(validate_config(&future), Err(ValidationError::UnsupportedVersion(2)));
    }

    #[test]
    fn test_field_errors_lists_every_failure() {
        let errors = field_errors(&config(0, "2023-02-30", "Nowhere/City"));
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ValidationError::AgeOutOfRange(0)));
        assert!(matches!(errors[1], ValidationError::InvalidBirthday(_)));
        assert!(matches!(errors[2], ValidationError::UnknownTimeZone(_)));

        assert!(field_errors(&config(80, "2000-01-01", "UTC")).is_empty());
    }
}
