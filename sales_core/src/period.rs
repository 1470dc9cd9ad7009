//! Calendar-month period labels

use crate::{CoreError, Result};
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar month identified by year and month number.
///
/// Stored as the first day of the month, so every value is a month chrono
/// can represent and ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    /// Create a period, rejecting month numbers outside 1..=12 and years
    /// outside the supported calendar range
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::InvalidMonth(month));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or(CoreError::YearOutOfRange(year))
    }

    /// The month a date falls in
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    /// Latest representable month
    pub fn last_supported() -> Self {
        Self::from_date(NaiveDate::MAX)
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// First calendar day of the month
    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// The following calendar month
    pub fn succ(&self) -> Self {
        self.add_months(1)
    }

    /// Step forward by `months`, or `None` past the supported range
    pub fn checked_add_months(&self, months: u32) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(months))
            .map(|first| Self { first })
    }

    /// Step forward by `months` calendar months, saturating at
    /// [`YearMonth::last_supported`]
    pub fn add_months(&self, months: u32) -> Self {
        self.checked_add_months(months)
            .unwrap_or_else(Self::last_supported)
    }

    /// Iterator over `count` consecutive months starting at `self`
    pub fn range(self, count: usize) -> impl Iterator<Item = YearMonth> {
        (0..count as u32).map(move |offset| self.add_months(offset))
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidPeriod(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_rejects_invalid_month() {
        assert_eq!(YearMonth::new(2020, 0), Err(CoreError::InvalidMonth(0)));
        assert_eq!(YearMonth::new(2020, 13), Err(CoreError::InvalidMonth(13)));
    }

    #[test]
    fn test_rejects_years_chrono_cannot_represent() {
        assert_eq!(
            YearMonth::new(i32::MAX, 1),
            Err(CoreError::YearOutOfRange(i32::MAX))
        );
        assert!("999999-01".parse::<YearMonth>().is_err());

        let last = YearMonth::last_supported();
        assert_eq!(last.month(), 12);
        assert_eq!(last.first_day().year(), NaiveDate::MAX.year());
    }

    #[test]
    fn test_add_months_saturates() {
        let last = YearMonth::last_supported();
        assert_eq!(last.checked_add_months(1), None);
        assert_eq!(last.succ(), last);
        let start = YearMonth::new(2016, 1).unwrap();
        assert_eq!(start.checked_add_months(u32::MAX), None);
    }

    #[rstest]
    #[case(2016, 1, 2016, 2)]
    #[case(2016, 11, 2016, 12)]
    #[case(2016, 12, 2017, 1)]
    fn test_succ(#[case] y: i32, #[case] m: u32, #[case] ny: i32, #[case] nm: u32) {
        let next = YearMonth::new(y, m).unwrap().succ();
        assert_eq!(next, YearMonth::new(ny, nm).unwrap());
    }

    #[test]
    fn test_add_months_across_years() {
        let start = YearMonth::new(2017, 11).unwrap();
        assert_eq!(start.add_months(14), YearMonth::new(2019, 1).unwrap());
        assert_eq!(start.add_months(0), start);
    }

    #[test]
    fn test_ordering_is_chronological() {
        let dec = YearMonth::new(2016, 12).unwrap();
        let jan = YearMonth::new(2017, 1).unwrap();
        assert!(dec < jan);
    }

    #[test]
    fn test_from_date_and_first_day() {
        let date = NaiveDate::from_ymd_opt(2015, 3, 27).unwrap();
        let period = YearMonth::from_date(date);
        assert_eq!(period.first_day(), NaiveDate::from_ymd_opt(2015, 3, 1).unwrap());
        assert_eq!((period.year(), period.month()), (2015, 3));
        assert_eq!(YearMonth::from_date(period.first_day()), period);
    }

    #[test]
    fn test_display_and_parse() {
        let period = YearMonth::new(2014, 7).unwrap();
        assert_eq!(period.to_string(), "2014-07");
        assert_eq!("2014-07".parse::<YearMonth>().unwrap(), period);
        assert!("2014/07".parse::<YearMonth>().is_err());
        assert!("2014-13".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_serde_as_label() {
        let period = YearMonth::new(2018, 2).unwrap();
        let json = serde_json::to_string(&period).unwrap();
        assert_eq!(json, "\"2018-02\"");
        let back: YearMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, period);
    }

    #[test]
    fn test_range() {
        let labels: Vec<String> = YearMonth::new(2017, 11)
            .unwrap()
            .range(3)
            .map(|p| p.to_string())
            .collect();
        assert_eq!(labels, vec!["2017-11", "2017-12", "2018-01"]);
    }
}
