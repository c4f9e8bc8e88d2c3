use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, de};

/// Only schema version understood by this build
pub const CONFIG_VERSION: u32 = 1;

/// The four user-supplied fields that drive every countdown.
///
/// This is the raw, possibly untrusted shape: it is what a share token or the
/// store decodes into. Serialized keys are the compact `v`/`a`/`b`/`t` names,
/// in declaration order; the long names are accepted when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(rename = "v", alias = "version")]
    pub version: u32,
    #[serde(rename = "a", alias = "ageAtDeath", deserialize_with = "whole_number")]
    pub age_at_death: i64,
    #[serde(rename = "b", alias = "birthday")]
    pub birthday: String,
    #[serde(rename = "t", alias = "timeZone")]
    pub time_zone: String,
}

impl Configuration {
    pub fn new(age_at_death: i64, birthday: impl Into<String>, time_zone: impl Into<String>) -> Self {
        Self {
            version: CONFIG_VERSION,
            age_at_death,
            birthday: birthday.into(),
            time_zone: time_zone.into(),
        }
    }
}

/// Accepts integral JSON numbers written either way (`80` or `80.0`).
/// A fractional age fails to deserialize.
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    match Number::deserialize(deserializer)? {
        Number::Int(n) => Ok(n),
        Number::Float(f) if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => Ok(f as i64),
        Number::Float(f) => Err(de::Error::custom(format!(
            "expected a whole number, got {f}"
        ))),
    }
}

/// A configuration that passed validation, with its birthday parsed and its
/// zone resolved. Only the validator can build one.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidConfig {
    raw: Configuration,
    age_at_death: u32,
    birthday: NaiveDate,
    time_zone: Tz,
}

impl ValidConfig {
    pub(crate) fn new(raw: Configuration, age_at_death: u32, birthday: NaiveDate, time_zone: Tz) -> Self {
        Self {
            raw,
            age_at_death,
            birthday,
            time_zone,
        }
    }

    pub fn age_at_death(&self) -> u32 {
        self.age_at_death
    }

    pub fn birthday(&self) -> NaiveDate {
        self.birthday
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// The validated fields in their serializable form
    pub fn config(&self) -> &Configuration {
        &self.raw
    }

    pub fn into_config(self) -> Configuration {
        self.raw
    }
}
