//! Time types and day count conventions for financial calculations.
//!
//! This module provides:
//! - `Date`: type-safe date wrapper around `chrono::NaiveDate`
//! - `DayCountConvention`: industry-standard day count conventions
//! - Year fraction calculations anchoring simulation time grids
//!
//! # Examples
//!
//! ```
//! use simkit_core::types::time::{Date, DayCountConvention};
//!
//! let start = Date::from_ymd(2026, 1, 1).unwrap();
//! let end = Date::from_ymd(2026, 7, 1).unwrap();
//!
//! let yf = DayCountConvention::Act365.year_fraction(start, end);
//! assert!((yf - 0.4958).abs() < 0.001);
//! ```

use chrono::{Datelike, Days, NaiveDate};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Type-safe date wrapper around `chrono::NaiveDate`.
///
/// Provides ISO 8601 parsing, day arithmetic, and total ordering, which is
/// all the simulation engine needs from its calendar collaborator.
///
/// # Examples
///
/// ```
/// use simkit_core::types::time::Date;
///
/// let date = Date::from_ymd(2026, 6, 15).unwrap();
/// assert_eq!(date.year(), 2026);
///
/// let parsed: Date = "2026-06-15".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let later = date.add_days(10);
/// assert_eq!(later - date, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a `Date` from year, month, and day components.
    ///
    /// # Errors
    ///
    /// Returns `DateError::InvalidDate` if the components do not form a
    /// valid calendar date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses a date from an ISO 8601 string (YYYY-MM-DD).
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::from_str(s).map(Date).map_err(|_| DateError::ParseError {
            input: s.to_string(),
        })
    }

    /// Returns the date shifted forward by `days` calendar days.
    ///
    /// Saturates at the chrono date range boundary, which is far outside
    /// any realistic simulation horizon.
    #[must_use]
    pub fn add_days(&self, days: u64) -> Self {
        Date(
            self.0
                .checked_add_days(Days::new(days))
                .unwrap_or(NaiveDate::MAX),
        )
    }

    /// Returns the underlying `chrono::NaiveDate`.
    #[inline]
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    #[inline]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[inline]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component.
    #[inline]
    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl From<NaiveDate> for Date {
    fn from(d: NaiveDate) -> Self {
        Date(d)
    }
}

impl Sub for Date {
    type Output = i64;

    /// Number of calendar days from `rhs` to `self` (negative if earlier).
    fn sub(self, rhs: Self) -> i64 {
        (self.0 - rhs.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Day count convention for year fraction calculations.
///
/// The simulation engine is convention-agnostic: the orchestrator supplies
/// one convention and every registered date is converted into a year
/// fraction from the anchor date with it.
///
/// # Examples
///
/// ```
/// use simkit_core::types::time::{Date, DayCountConvention};
///
/// let start = Date::from_ymd(2026, 1, 1).unwrap();
/// let end = start.add_days(90);
///
/// assert!((DayCountConvention::Act365.year_fraction(start, end) - 90.0 / 365.0).abs() < 1e-12);
/// assert!((DayCountConvention::Act360.year_fraction(start, end) - 90.0 / 360.0).abs() < 1e-12);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayCountConvention {
    /// Actual days / 365.
    #[default]
    Act365,
    /// Actual days / 360.
    Act360,
    /// 30/360 (bond basis).
    Thirty360,
}

impl DayCountConvention {
    /// Returns the market-standard name of the convention.
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act365 => "ACT/365",
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    /// Calculates the year fraction from `start` to `end`.
    ///
    /// Returns a negative value when `end` precedes `start`; callers that
    /// need a time axis should sort their dates first.
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Act365 => (end - start) as f64 / 365.0,
            DayCountConvention::Act360 => (end - start) as f64 / 360.0,
            DayCountConvention::Thirty360 => {
                let d1 = (start.day() as i64).min(30);
                // 30/360 US: roll end-of-month day 31 back to 30 only when
                // the start day is already 30 or 31.
                let d2 = if end.day() == 31 && d1 == 30 {
                    30
                } else {
                    end.day() as i64
                };
                let days = 360 * (end.year() as i64 - start.year() as i64)
                    + 30 * (end.month() as i64 - start.month() as i64)
                    + (d2 - d1);
                days as f64 / 360.0
            }
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_ymd_valid() {
        let date = Date::from_ymd(2026, 6, 15).unwrap();
        assert_eq!(date.year(), 2026);
        assert_eq!(date.month(), 6);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_from_ymd_leap_day() {
        assert!(Date::from_ymd(2024, 2, 29).is_ok());
        assert!(Date::from_ymd(2026, 2, 29).is_err());
    }

    #[test]
    fn test_parse_iso8601() {
        let date = Date::parse("2026-06-15").unwrap();
        assert_eq!(date, Date::from_ymd(2026, 6, 15).unwrap());

        assert!(Date::parse("15/06/2026").is_err());
    }

    #[test]
    fn test_day_arithmetic() {
        let start = Date::from_ymd(2026, 1, 1).unwrap();
        let end = start.add_days(31);
        assert_eq!(end, Date::from_ymd(2026, 2, 1).unwrap());
        assert_eq!(end - start, 31);
        assert_eq!(start - end, -31);
    }

    #[test]
    fn test_ordering() {
        let earlier = Date::from_ymd(2026, 1, 1).unwrap();
        let later = Date::from_ymd(2026, 1, 2).unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_display_roundtrip() {
        let date = Date::from_ymd(2026, 6, 5).unwrap();
        assert_eq!(format!("{}", date), "2026-06-05");
        assert_eq!(Date::parse(&format!("{}", date)).unwrap(), date);
    }

    #[test]
    fn test_act365_year_fraction() {
        let start = Date::from_ymd(2026, 1, 1).unwrap();
        let yf = DayCountConvention::Act365.year_fraction(start, start.add_days(365));
        assert_relative_eq!(yf, 1.0);
    }

    #[test]
    fn test_act360_year_fraction() {
        let start = Date::from_ymd(2026, 1, 1).unwrap();
        let yf = DayCountConvention::Act360.year_fraction(start, start.add_days(180));
        assert_relative_eq!(yf, 0.5);
    }

    #[test]
    fn test_thirty360_full_year() {
        let start = Date::from_ymd(2026, 1, 15).unwrap();
        let end = Date::from_ymd(2027, 1, 15).unwrap();
        let yf = DayCountConvention::Thirty360.year_fraction(start, end);
        assert_relative_eq!(yf, 1.0);
    }

    #[test]
    fn test_thirty360_end_of_month() {
        let start = Date::from_ymd(2026, 1, 30).unwrap();
        let end = Date::from_ymd(2026, 3, 31).unwrap();
        // d1 = 30 so d2 rolls 31 -> 30: 60 days on a 30/360 basis.
        let yf = DayCountConvention::Thirty360.year_fraction(start, end);
        assert_relative_eq!(yf, 60.0 / 360.0);
    }

    #[test]
    fn test_zero_year_fraction() {
        let date = Date::from_ymd(2026, 1, 1).unwrap();
        for convention in [
            DayCountConvention::Act365,
            DayCountConvention::Act360,
            DayCountConvention::Thirty360,
        ] {
            assert_eq!(convention.year_fraction(date, date), 0.0);
        }
    }

    #[test]
    fn test_convention_names() {
        assert_eq!(DayCountConvention::Act365.name(), "ACT/365");
        assert_eq!(DayCountConvention::Act360.name(), "ACT/360");
        assert_eq!(DayCountConvention::Thirty360.name(), "30/360");
    }

    proptest::proptest! {
        #[test]
        fn prop_actual_conventions_are_additive(
            a in 0u64..20_000,
            b in 0u64..20_000,
        ) {
            let d0 = Date::from_ymd(2026, 1, 1).unwrap();
            let d1 = d0.add_days(a);
            let d2 = d1.add_days(b);
            for convention in [DayCountConvention::Act365, DayCountConvention::Act360] {
                let whole = convention.year_fraction(d0, d2);
                let split = convention.year_fraction(d0, d1) + convention.year_fraction(d1, d2);
                proptest::prop_assert!((whole - split).abs() < 1e-9);
            }
        }
    }
}
