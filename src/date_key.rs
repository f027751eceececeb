use chrono::{Duration, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

const KEY_FORMAT: &str = "%Y-%m-%d";

/// A local calendar date, rendered as its canonical `YYYY-MM-DD` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date key '{0}', expected YYYY-MM-DD")]
pub struct DateKeyError(pub String);

impl DateKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Local calendar date of an instant given in Unix epoch milliseconds.
    /// Out-of-range instants clamp to the epoch day.
    pub fn from_timestamp_millis(millis: i64) -> Self {
        let date = Local
            .timestamp_millis_opt(millis)
            .earliest()
            .map(|instant| instant.date_naive())
            .unwrap_or_default();
        Self(date)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn pred(self) -> Self {
        Self(self.0 - Duration::days(1))
    }

    pub fn plus_days(self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    pub fn minus_days(self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    /// Signed number of calendar days from `earlier` to `self`.
    pub fn days_since(self, earlier: DateKey) -> i64 {
        (self.0 - earlier.0).num_days()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(value, KEY_FORMAT)
            .map_err(|_| DateKeyError(value.to_string()))?;
        let key = Self(date);
        // chrono accepts unpadded fields; only the canonical spelling is a key.
        if key.to_string() != value {
            return Err(DateKeyError(value.to_string()));
        }
        Ok(key)
    }
}

impl TryFrom<String> for DateKey {
    type Error = DateKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero_padded_key() {
        let key = DateKey::from_ymd(2026, 1, 5).unwrap();
        assert_eq!(key.to_string(), "2026-01-05");
    }

    #[test]
    fn parses_only_canonical_keys() {
        assert_eq!(
            "2024-02-29".parse::<DateKey>().unwrap(),
            DateKey::from_ymd(2024, 2, 29).unwrap()
        );
        assert!("2024-2-9".parse::<DateKey>().is_err());
        assert!("2023-02-29".parse::<DateKey>().is_err());
        assert!("yesterday".parse::<DateKey>().is_err());
    }

    #[test]
    fn steps_across_month_and_year_boundaries() {
        let new_year = DateKey::from_ymd(2026, 1, 1).unwrap();
        assert_eq!(new_year.pred(), DateKey::from_ymd(2025, 12, 31).unwrap());
        assert_eq!(new_year.pred().plus_days(1), new_year);
        assert_eq!(new_year.minus_days(366), DateKey::from_ymd(2024, 12, 31).unwrap());
    }

    #[test]
    fn days_since_is_signed() {
        let a = DateKey::from_ymd(2026, 3, 1).unwrap();
        let b = DateKey::from_ymd(2026, 2, 27).unwrap();
        assert_eq!(a.days_since(b), 2);
        assert_eq!(b.days_since(a), -2);
    }

    #[test]
    fn timestamp_maps_to_local_calendar_date() {
        let noon = Local.with_ymd_and_hms(2026, 7, 14, 12, 0, 0).unwrap();
        let key = DateKey::from_timestamp_millis(noon.timestamp_millis());
        assert_eq!(key, DateKey::from_ymd(2026, 7, 14).unwrap());
    }

    #[test]
    fn serializes_as_plain_string() {
        let key = DateKey::from_ymd(2026, 10, 19).unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2026-10-19\"");
        let back: DateKey = serde_json::from_str("\"2026-10-19\"").unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<DateKey>("\"2026-13-01\"").is_err());
    }
}
