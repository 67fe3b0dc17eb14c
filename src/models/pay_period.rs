//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type, a calendar year-month that
//! identifies which month a payroll record or attendance entry belongs to.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EngineError, EngineResult};

/// A calendar month used as the payroll period.
///
/// Serialized as a `"YYYY-MM"` string, matching the period keys stored on
/// payroll records.
///
/// # Example
///
/// ```
/// use hris_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period: PayPeriod = "2026-08".parse().unwrap();
/// assert_eq!(period.to_string(), "2026-08");
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 8, 25).unwrap()));
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PayPeriod {
    year: i32,
    month: u32,
}

impl PayPeriod {
    /// Creates a pay period from a year and month.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error if the month is outside 1..=12.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::Validation {
                field: "period".to_string(),
                message: format!("month {} is outside 1..=12", month),
            });
        }
        Ok(Self { year, month })
    }

    /// Returns the pay period containing the given date.
    pub fn of_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The calendar year of this period.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month of this period (1..=12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Checks if a given date falls within this pay period.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for PayPeriod {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::Validation {
            field: "period".to_string(),
            message: format!("expected YYYY-MM, got '{}'", s),
        };

        let (year_str, month_str) = s.split_once('-').ok_or_else(invalid)?;
        if year_str.len() != 4 || month_str.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year_str.parse().map_err(|_| invalid())?;
        let month: u32 = month_str.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl Serialize for PayPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PayPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    /// PP-001: contains_date within period
    #[test]
    fn test_contains_date_within_period() {
        let period = PayPeriod::new(2026, 8).unwrap();
        assert!(period.contains_date(make_date("2026-08-01")));
        assert!(period.contains_date(make_date("2026-08-31")));
    }

    /// PP-002: contains_date outside period
    #[test]
    fn test_contains_date_outside_period() {
        let period = PayPeriod::new(2026, 8).unwrap();
        assert!(!period.contains_date(make_date("2026-07-31")));
        assert!(!period.contains_date(make_date("2026-09-01")));
        assert!(!period.contains_date(make_date("2025-08-15")));
    }

    #[test]
    fn test_of_date() {
        let period = PayPeriod::of_date(make_date("2026-01-15"));
        assert_eq!(period.year(), 2026);
        assert_eq!(period.month(), 1);
    }

    #[test]
    fn test_display_pads_month() {
        let period = PayPeriod::new(2026, 3).unwrap();
        assert_eq!(period.to_string(), "2026-03");
    }

    #[test]
    fn test_parse_valid() {
        let period: PayPeriod = "2026-08".parse().unwrap();
        assert_eq!(period, PayPeriod::new(2026, 8).unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("2026".parse::<PayPeriod>().is_err());
        assert!("2026-13".parse::<PayPeriod>().is_err());
        assert!("2026-0".parse::<PayPeriod>().is_err());
        assert!("26-08".parse::<PayPeriod>().is_err());
        assert!("2026-ab".parse::<PayPeriod>().is_err());
    }

    #[test]
    fn test_parse_error_is_validation() {
        match "not-a-period".parse::<PayPeriod>() {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "period"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_new_rejects_month_out_of_range() {
        assert!(PayPeriod::new(2026, 0).is_err());
        assert!(PayPeriod::new(2026, 13).is_err());
    }

    #[test]
    fn test_serialize_as_string() {
        let period = PayPeriod::new(2026, 8).unwrap();
        let json = serde_json::to_string(&period).unwrap();
        assert_eq!(json, "\"2026-08\"");
    }

    #[test]
    fn test_deserialize_from_string() {
        let period: PayPeriod = serde_json::from_str("\"2025-12\"").unwrap();
        assert_eq!(period, PayPeriod::new(2025, 12).unwrap());
    }

    #[test]
    fn test_deserialize_rejects_malformed() {
        assert!(serde_json::from_str::<PayPeriod>("\"2025/12\"").is_err());
    }

    #[test]
    fn test_ordering_by_year_then_month() {
        let a = PayPeriod::new(2025, 12).unwrap();
        let b = PayPeriod::new(2026, 1).unwrap();
        let c = PayPeriod::new(2026, 2).unwrap();
        assert!(a < b);
        assert!(b < c);
    }
}
