//! Calendar dates as exchanged with the backend.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

const FORMAT: &str = "%Y-%m-%d";

/// A calendar date written as `YYYY-MM-DD`.
///
/// Parsing also accepts an RFC 3339 date-time such as `2024-06-15T00:00:00.000Z` and keeps only
/// the date portion as written, with no timezone conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDate(NaiveDate);

impl IsoDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl FromStr for IsoDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match NaiveDate::parse_from_str(s, FORMAT) {
            Ok(d) => Ok(Self(d)),
            Err(e) => match DateTime::parse_from_rfc3339(s) {
                Ok(dt) => Ok(Self(dt.date_naive())),
                // report the error for the primary format
                Err(_) => Err(e),
            },
        }
    }
}

impl Display for IsoDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl Deref for IsoDate {
    type Target = NaiveDate;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<NaiveDate> for IsoDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl Serialize for IsoDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for IsoDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        IsoDate::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        let d = IsoDate::from_str("2024-06-15").unwrap();
        assert_eq!(d, IsoDate::from_ymd(2024, 6, 15).unwrap());
        assert_eq!(d.to_string(), "2024-06-15");
    }

    #[test]
    fn test_parse_timestamp_truncates() {
        let d = IsoDate::from_str("2024-06-15T23:59:59.000Z").unwrap();
        assert_eq!(d.to_string(), "2024-06-15");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(IsoDate::from_str("15/06/2024").is_err());
        assert!(IsoDate::from_str("").is_err());
    }

    #[test]
    fn test_serde() {
        let d: IsoDate = serde_json::from_str("\"2023-01-31\"").unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"2023-01-31\"");
    }
}
