//! Shorthand builders for tests.

use crate::{CalendarMonth, DueDate, Month, RecurringDay};

pub(crate) fn month(value: u8) -> Month {
    Month::new(value).expect("test month out of range")
}

pub(crate) fn period(year: i32, value: u8) -> CalendarMonth {
    CalendarMonth::new(year, month(value))
}

pub(crate) fn date(year: i32, value: u8, day: u8) -> DueDate {
    DueDate::new(year, value, day).expect("test date is not a real day")
}

pub(crate) const fn day(value: i32) -> RecurringDay {
    RecurringDay::new(value)
}
