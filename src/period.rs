use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    DATE_SEPARATOR, DueDate, MONTHS_PER_YEAR, ParseError, RecurringDay,
    prelude::*,
    schedule,
    types::{Day, Month, days_in_month},
};

const MONTHS: i64 = MONTHS_PER_YEAR as i64;
/// Zero-based month index of January in `i32::MIN`
const MIN_INDEX: i64 = i32::MIN as i64 * MONTHS;
/// Zero-based month index of December in `i32::MAX`
const MAX_INDEX: i64 = i32::MAX as i64 * MONTHS + (MONTHS - 1);

/// A (year, month) billing period.
///
/// This is the key bill payments are recorded under. Ordering is
/// chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{:04}-{:02}", "year", "month.get()")]
pub struct CalendarMonth {
    year:  i32,
    month: Month,
}

impl CalendarMonth {
    pub const fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// Builds a period from raw integers, carrying any month overflow or
    /// underflow into the year: month 13 of 2026 is January 2027 and
    /// month 0 of 2026 is December 2025.
    pub fn normalized(year: i32, month: i32) -> Self {
        Self::from_index0(i64::from(year) * MONTHS + i64::from(month) - 1)
    }

    /// Inverse of `index0`. Indexes beyond the `i32` year range saturate.
    fn from_index0(index: i64) -> Self {
        let index = index.clamp(MIN_INDEX, MAX_INDEX);
        let year = index.div_euclid(MONTHS);
        let month = index.rem_euclid(MONTHS);
        Self {
            // Both are in range after the clamp above
            year:  i32::try_from(year).unwrap_or(if year < 0 { i32::MIN } else { i32::MAX }),
            month: Month::saturating(u8::try_from(month + 1).unwrap_or(MONTHS_PER_YEAR)),
        }
    }

    fn index0(self) -> i64 {
        i64::from(self.year) * MONTHS + i64::from(self.month.index0())
    }

    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month as u8
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    #[inline]
    pub const fn month_typed(&self) -> Month {
        self.month
    }

    /// Comparable period number, `year * 12 + month`.
    pub fn period_index(&self) -> i64 {
        i64::from(self.year) * MONTHS + i64::from(self.month.get())
    }

    /// Moves `months` periods forward (or back when negative), rolling the
    /// year as needed.
    pub fn offset(self, months: i64) -> Self {
        Self::from_index0(self.index0().saturating_add(months))
    }

    /// The following period; December rolls to January of the next year.
    pub fn next(self) -> Self {
        self.offset(1)
    }

    pub fn prev(self) -> Self {
        self.offset(-1)
    }

    /// Signed number of periods from `self` to `other`.
    pub fn months_until(self, other: Self) -> i64 {
        other.index0() - self.index0()
    }

    /// Number of days in this period
    pub const fn days(&self) -> u8 {
        days_in_month(self.year, self.month)
    }

    pub const fn first_day(&self) -> DueDate {
        DueDate::from_valid(self.year, self.month, Day::saturating(1))
    }

    pub const fn last_day(&self) -> DueDate {
        DueDate::from_valid(self.year, self.month, Day::last_of(self.year, self.month))
    }

    /// Due date within this period for a bill recurring on `recurring_day`.
    pub fn due_date(&self, recurring_day: RecurringDay) -> DueDate {
        schedule::due_date_for_month(self.year, self.month, recurring_day)
    }

    /// Period the local clock is currently in
    pub fn current() -> Self {
        DueDate::today().period()
    }
}

impl From<DueDate> for CalendarMonth {
    fn from(date: DueDate) -> Self {
        date.period()
    }
}

impl FromStr for CalendarMonth {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        // Split from the right so a leading minus stays with the year
        let (year_str, month_str) = trimmed
            .rsplit_once(DATE_SEPARATOR)
            .ok_or_else(|| ParseError::InvalidFormat(trimmed.to_owned()))?;
        let year = DueDate::parse_year(year_str)?;
        let month = Month::new(DueDate::parse_u8(month_str)?)?;

        Ok(Self { year, month })
    }
}
