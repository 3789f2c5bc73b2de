//! Due-date resolution for bills that recur on a fixed day of the month.
//!
//! Both operations are total: any year, any validated month and any
//! recurring day produce a real calendar date. Oversized days are clamped to
//! the month's last day, and a non-positive day means "due by month end".

use log::trace;

use crate::{
    CalendarMonth, DueDate, RecurringDay,
    types::{Day, Month, days_in_month},
};

/// Due date within `year`/`month` for a bill recurring on `recurring_day`.
///
/// A day past the end of the month resolves to the month's last day, so a
/// bill on the 31st is due on February 28th (29th in leap years) and on the
/// 30th of 30-day months. A month-end day resolves to the last day of the
/// requested month itself.
pub fn due_date_for_month(year: i32, month: Month, recurring_day: RecurringDay) -> DueDate {
    let last_day = days_in_month(year, month);
    let day = recurring_day.day_in(last_day);

    if recurring_day.is_month_end() {
        trace!("no fixed bill day, {:04}-{:02} due on month end ({day})", year, month.get());
    } else if i32::from(day) < recurring_day.get() {
        trace!("bill day {recurring_day} clamped to {day} for {:04}-{:02}", year, month.get());
    }

    DueDate::from_valid(year, month, Day::saturating(day))
}

/// Next due date on or after `reference`.
///
/// A due date falling on the reference day itself has not passed yet. When
/// this month's due date is already behind the reference, the result is the
/// due date in the following month (December rolls into January of the next
/// year). Never looks further than one month ahead.
///
/// Any time of day on the reference is ignored. December of `i32::MAX` has
/// no following month, so once its due date has passed the result stays in
/// that December and lies before the reference.
pub fn next_due_date(reference: impl Into<DueDate>, recurring_day: RecurringDay) -> DueDate {
    let today = reference.into();
    let current = today.period();

    let due_this_month = current.due_date(recurring_day);
    if due_this_month >= today {
        return due_this_month;
    }

    let next = current.next();
    trace!("due date {due_this_month} already passed on {today}, moving to {next}");
    next.due_date(recurring_day)
}

/// Successive due dates, one per month, starting with `next_due_date`.
///
/// Ends after December of the last representable year.
#[derive(Debug, Clone)]
pub struct DueDates {
    next:          Option<CalendarMonth>,
    recurring_day: RecurringDay,
}

impl DueDates {
    pub fn starting(reference: impl Into<DueDate>, recurring_day: RecurringDay) -> Self {
        let first = next_due_date(reference, recurring_day);
        Self {
            next: Some(first.period()),
            recurring_day,
        }
    }
}

impl Iterator for DueDates {
    type Item = DueDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let following = current.next();
        self.next = (following != current).then_some(following);
        Some(current.due_date(self.recurring_day))
    }
}
