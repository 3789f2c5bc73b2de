mod consts;
mod cycle;
mod period;
mod prelude;
mod schedule;
mod status;
mod types;

#[cfg(test)]
mod test_utils;

pub use consts::*;
pub use cycle::{BillCycle, BillSchedule, ScheduleError};
pub use period::CalendarMonth;
pub use schedule::{DueDates, due_date_for_month, next_due_date};
pub use status::{DueItem, DueStatus, sort_due_items, upcoming};
pub use types::{Day, Month, RecurringDay, days_in_month, is_leap_year};

use crate::prelude::*;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use std::str::FromStr;

/// A concrete calendar date a bill falls due on.
///
/// Date only, no time of day and no timezone. The day is always a real day
/// of the month. Ordering is chronological (year, then month, then day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year", "month.get()", "day.get()")]
pub struct DueDate {
    year:  i32,
    month: Month,
    day:   Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {_0} (outside the supported date range)")]
    InvalidYear(i32),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year:04}-{month:02}")]
    InvalidDay { year: i32, month: u8, day: u8 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl DueDate {
    /// Creates a date from raw components, validating month and day.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` or `ParseError::InvalidDay` when the
    /// components do not name a real calendar day.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, ParseError> {
        let month = Month::new(month)?;
        let day = Day::new(day, year, month)?;
        Ok(Self { year, month, day })
    }

    /// Caller guarantees `day` fits the month.
    pub(crate) const fn from_valid(year: i32, month: Month, day: Day) -> Self {
        Self { year, month, day }
    }

    /// Today's date on the local wall clock
    pub fn today() -> Self {
        Local::now().date_naive().into()
    }

    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month component as u8
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    /// Returns the day component as u8
    #[inline]
    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    #[inline]
    pub const fn month_typed(&self) -> Month {
        self.month
    }

    #[inline]
    pub const fn day_typed(&self) -> Day {
        self.day
    }

    /// The (year, month) period this date falls in. Matches the keys bill
    /// payments are recorded under.
    pub const fn period(&self) -> CalendarMonth {
        CalendarMonth::new(self.year, self.month)
    }

    /// Converts to (year, month, day)
    pub const fn to_tuple(&self) -> (i32, u8, u8) {
        (self.year, self.month.get(), self.day.get())
    }

    /// Whole days from `self` to `other`; negative when `other` is earlier.
    pub fn days_until(&self, other: Self) -> i64 {
        other.day_number() - self.day_number()
    }

    /// Days since 1970-01-01 in the proleptic Gregorian calendar.
    fn day_number(self) -> i64 {
        let month = i64::from(self.month.get());
        let day = i64::from(self.day.get());
        // Count years from March so the leap day is the last day of the year
        let year = i64::from(self.year) - i64::from(month <= 2);
        let era = year.div_euclid(400);
        let year_of_era = year.rem_euclid(400);
        let month_from_march = (month + 9) % 12;
        let day_of_year = (153 * month_from_march + 2) / 5 + day - 1;
        let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
        era * 146_097 + day_of_era - 719_468
    }

    /// The date `days` after this one; negative goes back.
    ///
    /// Saturates at 0001-01-01 of `i32::MIN` and 12-31 of `i32::MAX`.
    pub fn add_days(self, days: i64) -> Self {
        let first = Self::from_valid(i32::MIN, Month::JANUARY, Day::saturating(1)).day_number();
        let last = Self::from_valid(i32::MAX, Month::DECEMBER, Day::saturating(31)).day_number();
        Self::from_day_number(self.day_number().saturating_add(days).clamp(first, last))
    }

    /// Inverse of `day_number`. `number` must lie within the `i32` year range.
    fn from_day_number(number: i64) -> Self {
        let shifted = number + 719_468;
        let era = shifted.div_euclid(146_097);
        let day_of_era = shifted.rem_euclid(146_097);
        let year_of_era =
            (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
        let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
        let month_from_march = (5 * day_of_year + 2) / 153;
        let day = day_of_year - (153 * month_from_march + 2) / 5 + 1;
        let month = if month_from_march < 10 { month_from_march + 3 } else { month_from_march - 9 };
        let year = year_of_era + era * 400 + i64::from(month <= 2);

        let year = i32::try_from(year).unwrap_or(if year < 0 { i32::MIN } else { i32::MAX });
        let month = Month::saturating(u8::try_from(month).unwrap_or(MAX_MONTH));
        let day = Day::saturating(u8::try_from(day).unwrap_or(MIN_DAY));
        Self::from_valid(year, month, day)
    }
}

impl DueDate {
    pub(crate) fn parse_year(s: &str) -> Result<i32, ParseError> {
        s.trim()
            .parse::<i32>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }

    pub(crate) fn parse_u8(s: &str) -> Result<u8, ParseError> {
        s.trim()
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }
}

impl FromStr for DueDate {
    type Err = ParseError;

    /// Parses `YYYY-MM-DD`. A leading minus is allowed on the year.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        // Right to left: day, month, then everything left over is the year
        let parts: Vec<&str> = trimmed.rsplitn(3, DATE_SEPARATOR).collect();
        let [day, month, year] = parts.as_slice() else {
            return Err(ParseError::InvalidFormat(trimmed.to_owned()));
        };

        let year = Self::parse_year(year)?;
        let month = Self::parse_u8(month)?;
        let day = Self::parse_u8(day)?;
        Self::new(year, month, day)
    }
}

impl From<NaiveDate> for DueDate {
    fn from(date: NaiveDate) -> Self {
        // chrono guarantees month 1..=12 and a valid day
        let month = Month::saturating(u8::try_from(date.month()).unwrap_or(MAX_MONTH));
        let day = Day::saturating(u8::try_from(date.day()).unwrap_or(MIN_DAY));
        Self::from_valid(date.year(), month, day)
    }
}

/// Drops the time of day.
impl From<NaiveDateTime> for DueDate {
    fn from(datetime: NaiveDateTime) -> Self {
        datetime.date().into()
    }
}

impl TryFrom<DueDate> for NaiveDate {
    type Error = ParseError;

    fn try_from(date: DueDate) -> Result<Self, Self::Error> {
        Self::from_ymd_opt(date.year, u32::from(date.month()), u32::from(date.day()))
            .ok_or(ParseError::InvalidYear(date.year))
    }
}

impl TryFrom<(i32, u8, u8)> for DueDate {
    type Error = ParseError;

    fn try_from(value: (i32, u8, u8)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1, value.2)
    }
}

impl serde::Serialize for DueDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for DueDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, period};

    #[test]
    fn test_new_valid() {
        let d = DueDate::new(2026, 4, 30).unwrap();
        assert_eq!(d.year(), 2026);
        assert_eq!(d.month(), 4);
        assert_eq!(d.day(), 30);
        assert_eq!(d.to_tuple(), (2026, 4, 30));
    }

    #[test]
    fn test_new_invalid() {
        assert!(matches!(DueDate::new(2026, 13, 1), Err(ParseError::InvalidMonth(13))));
        assert!(matches!(DueDate::new(2026, 0, 1), Err(ParseError::InvalidMonth(0))));
        assert!(matches!(
            DueDate::new(2026, 2, 29),
            Err(ParseError::InvalidDay {
                year: 2026,
                month: 2,
                day: 29
            })
        ));
        assert!(DueDate::new(2028, 2, 29).is_ok());
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(date(2026, 4, 30) < date(2026, 5, 1));
        assert!(date(2025, 12, 31) < date(2026, 1, 1));
        assert!(date(2026, 4, 15) < date(2026, 4, 30));
        assert_eq!(date(2026, 4, 15), date(2026, 4, 15));
    }

    #[test]
    fn test_period() {
        assert_eq!(date(2026, 4, 15).period(), period(2026, 4));
    }

    #[test]
    fn test_days_until() {
        assert_eq!(date(2026, 4, 15).days_until(date(2026, 4, 30)), 15);
        assert_eq!(date(2026, 4, 30).days_until(date(2026, 4, 15)), -15);
        assert_eq!(date(2026, 4, 30).days_until(date(2026, 4, 30)), 0);
        assert_eq!(date(2025, 12, 31).days_until(date(2026, 1, 1)), 1);
        assert_eq!(date(2028, 2, 28).days_until(date(2028, 3, 1)), 2);
        assert_eq!(date(2026, 2, 28).days_until(date(2026, 3, 1)), 1);
        assert_eq!(date(2026, 1, 1).days_until(date(2027, 1, 1)), 365);
        assert_eq!(date(2028, 1, 1).days_until(date(2029, 1, 1)), 366);
    }

    #[test]
    fn test_day_number_epoch() {
        assert_eq!(date(1970, 1, 1).day_number(), 0);
        assert_eq!(date(1969, 12, 31).day_number(), -1);
        assert_eq!(date(2000, 3, 1).day_number(), 11_017);
    }

    #[test]
    fn test_add_days_cases() {
        struct TestCase {
            start:       DueDate,
            days:        i64,
            expected:    DueDate,
            description: &'static str,
        }

        let cases = [
            TestCase {
                start:       date(2026, 4, 28),
                days:        3,
                expected:    date(2026, 5, 1),
                description: "across a month end",
            },
            TestCase {
                start:       date(2026, 12, 30),
                days:        5,
                expected:    date(2027, 1, 4),
                description: "across a year end",
            },
            TestCase {
                start:       date(2028, 2, 27),
                days:        2,
                expected:    date(2028, 2, 29),
                description: "onto a leap day",
            },
            TestCase {
                start:       date(2026, 2, 27),
                days:        2,
                expected:    date(2026, 3, 1),
                description: "over February in a common year",
            },
            TestCase {
                start:       date(2026, 3, 1),
                days:        -1,
                expected:    date(2026, 2, 28),
                description: "backwards into February",
            },
            TestCase {
                start:       date(2026, 1, 1),
                days:        -1,
                expected:    date(2025, 12, 31),
                description: "backwards across a year end",
            },
            TestCase {
                start:       date(2026, 4, 10),
                days:        0,
                expected:    date(2026, 4, 10),
                description: "zero days",
            },
            TestCase {
                start:       date(1970, 1, 1),
                days:        11_017,
                expected:    date(2000, 3, 1),
                description: "from the epoch",
            },
            TestCase {
                start:       date(1600, 2, 29),
                days:        -366,
                expected:    date(1599, 2, 28),
                description: "before a 400-year leap cycle",
            },
        ];

        for case in &cases {
            assert_eq!(case.start.add_days(case.days), case.expected, "{}", case.description);
        }
    }

    #[test]
    fn test_add_days_matches_days_until() {
        let start = date(2026, 4, 10);
        for days in [-800, -59, -1, 1, 30, 365, 366, 1461] {
            assert_eq!(start.days_until(start.add_days(days)), days, "{days} days");
        }
    }

    #[test]
    fn test_add_days_saturates_at_year_limits() {
        assert_eq!(date(i32::MAX, 12, 30).add_days(5), date(i32::MAX, 12, 31));
        assert_eq!(date(i32::MIN, 1, 2).add_days(-5), date(i32::MIN, 1, 1));
        assert_eq!(date(2026, 4, 10).add_days(i64::MAX), date(i32::MAX, 12, 31));
        assert_eq!(date(2026, 4, 10).add_days(i64::MIN), date(i32::MIN, 1, 1));
    }

    #[test]
    fn test_display() {
        assert_eq!(date(2026, 4, 5).to_string(), "2026-04-05");
        assert_eq!(date(987, 12, 31).to_string(), "0987-12-31");
    }

    #[test]
    fn test_parse() {
        assert_eq!("2026-04-30".parse::<DueDate>().unwrap(), date(2026, 4, 30));
        assert_eq!(" 2026-02-28 ".parse::<DueDate>().unwrap(), date(2026, 2, 28));
        assert_eq!("-0001-03-01".parse::<DueDate>().unwrap().year(), -1);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("".parse::<DueDate>(), Err(ParseError::EmptyInput)));
        assert!(matches!("2026-04".parse::<DueDate>(), Err(ParseError::InvalidFormat(_))));
        assert!(matches!("2026-04-30-1".parse::<DueDate>(), Err(ParseError::InvalidFormat(_))));
        assert!(matches!("2026-04-XX".parse::<DueDate>(), Err(ParseError::InvalidFormat(_))));
        assert!(matches!("2026-02-30".parse::<DueDate>(), Err(ParseError::InvalidDay { .. })));
        assert!(matches!("2026-13-01".parse::<DueDate>(), Err(ParseError::InvalidMonth(13))));
    }

    #[test]
    fn test_error_messages() {
        let err = "2026-02-30".parse::<DueDate>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid day 30 for month 2026-02");

        let err = DueDate::new(2026, 13, 1).unwrap_err();
        assert_eq!(err.to_string(), "Invalid month: 13 (must be 1-12)");
    }

    #[test]
    fn test_serde_string_format() {
        let json = serde_json::to_string(&date(2026, 4, 30)).unwrap();
        assert_eq!(json, r#""2026-04-30""#);

        let parsed: DueDate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, date(2026, 4, 30));

        let result: Result<DueDate, _> = serde_json::from_str(r#""2026-04-31""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_chrono_interop() {
        let naive = NaiveDate::from_ymd_opt(2026, 4, 15).unwrap();
        let d: DueDate = naive.into();
        assert_eq!(d, date(2026, 4, 15));

        let back = NaiveDate::try_from(d).unwrap();
        assert_eq!(back, naive);
    }

    #[test]
    fn test_datetime_drops_time_of_day() {
        let late = NaiveDate::from_ymd_opt(2026, 4, 30)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let d: DueDate = late.into();
        assert_eq!(d, date(2026, 4, 30));
    }

    #[test]
    fn test_chrono_out_of_range_year() {
        let far = DueDate::new(i32::MAX, 1, 1).unwrap();
        assert!(matches!(NaiveDate::try_from(far), Err(ParseError::InvalidYear(_))));
    }

    #[test]
    fn test_try_from_tuple() {
        let d: DueDate = (2026, 4, 30).try_into().unwrap();
        assert_eq!(d, date(2026, 4, 30));

        let result: Result<DueDate, _> = (2026, 4, 31).try_into();
        assert!(result.is_err());
    }

    #[test]
    fn test_today_is_a_real_date() {
        let today = DueDate::today();
        assert!(today.day() >= 1);
        assert!(today.day() <= days_in_month(today.year(), today.month_typed()));
    }
}
