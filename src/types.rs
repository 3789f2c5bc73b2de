use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, DECEMBER, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE,
    LEAP_YEAR_CYCLE, MAX_MONTH, MIN_DAY, MONTH_END_DAY,
};
use crate::ParseError;
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12)
/// Uses `NonZeroU8` internally, so 0 is not a valid month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    pub const JANUARY: Self = Self(NonZeroU8::MIN);
    pub const DECEMBER: Self = Self::saturating(DECEMBER);

    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidMonth(value))?;
        if value > MAX_MONTH {
            return Err(ParseError::InvalidMonth(value));
        }
        Ok(Self(non_zero))
    }

    /// Pins `value` into `1..=12`. Only for values already known to be in range.
    pub(crate) const fn saturating(value: u8) -> Self {
        let value = if value > MAX_MONTH { MAX_MONTH } else { value };
        match NonZeroU8::new(value) {
            Some(non_zero) => Self(non_zero),
            None => Self::JANUARY,
        }
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// Zero-based position within the year (January is 0)
    #[inline]
    pub(crate) const fn index0(self) -> u8 {
        self.0.get() - 1
    }
}

impl TryFrom<u8> for Month {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A day-of-month value, always `>= 1`.
/// `Day::new` additionally checks it against the month's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    /// Creates a new Day, validating that it's non-zero and valid for the given year and month
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if the value is 0 or past the end of the month.
    pub fn new(value: u8, year: i32, month: Month) -> Result<Self, ParseError> {
        let invalid = ParseError::InvalidDay {
            year,
            month: month.get(),
            day: value,
        };
        let non_zero = NonZeroU8::new(value).ok_or_else(|| invalid.clone())?;
        if value > days_in_month(year, month) {
            return Err(invalid);
        }
        Ok(Self(non_zero))
    }

    /// Last day of the given month
    pub const fn last_of(year: i32, month: Month) -> Self {
        Self::saturating(days_in_month(year, month))
    }

    /// Raises 0 to `MIN_DAY`; callers bound the upper end themselves.
    pub(crate) const fn saturating(value: u8) -> Self {
        match NonZeroU8::new(value) {
            Some(non_zero) => Self(non_zero),
            None => Self(NonZeroU8::MIN),
        }
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Day {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        // No month context here, so only the lower bound is checked
        if value < MIN_DAY {
            return Err(ParseError::InvalidDay {
                year: 0,
                month: 0,
                day: value,
            });
        }
        Ok(Self::saturating(value))
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The configured day of month a bill falls due on.
///
/// Any `i32` is accepted. Values `<= 0` mean "no fixed day, due by month end";
/// positive values name the Nth day and are clamped to shorter months.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, From, Into,
    Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecurringDay(i32);

impl RecurringDay {
    pub const MONTH_END: Self = Self(MONTH_END_DAY);

    #[inline]
    pub const fn new(day: i32) -> Self {
        Self(day)
    }

    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// True when no specific day is configured
    #[inline]
    pub const fn is_month_end(self) -> bool {
        self.0 <= MONTH_END_DAY
    }

    /// Day within a month whose last day is `last_day`.
    pub const fn day_in(self, last_day: u8) -> u8 {
        if self.is_month_end() || self.0 >= last_day as i32 {
            last_day
        } else {
            // 1 <= self.0 < last_day <= 31
            self.0 as u8
        }
    }
}

// Helper functions

pub const fn is_leap_year(year: i32) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: i32, month: Month) -> u8 {
    if month.get() == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month.get() as usize]
    }
}
