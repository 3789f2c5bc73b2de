use log::debug;
use serde::{Deserialize, Serialize};

use crate::{BillSchedule, CalendarMonth, DUE_SOON_DAYS, DueDate, prelude::*};

/// Where a bill stands relative to its next due date.
///
/// Variants are declared in display priority: overdue bills sort first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    #[display(fmt = "overdue")]
    Overdue,
    #[display(fmt = "due_soon")]
    DueSoon,
    #[display(fmt = "upcoming")]
    Upcoming,
}

impl DueStatus {
    /// Classifies a bill whose next due date is `next_due`, as seen on
    /// `today` while looking at the `selected` period.
    ///
    /// `has_payment` says whether a payment is already recorded for the
    /// selected period; settled bills and bills not due until after the
    /// selected period are `Upcoming`.
    pub fn classify(
        next_due: DueDate,
        today: DueDate,
        selected: CalendarMonth,
        has_payment: bool,
    ) -> Self {
        if has_payment || next_due.period() > selected {
            return Self::Upcoming;
        }
        match today.days_until(next_due) {
            days if days < 0 => Self::Overdue,
            days if days <= DUE_SOON_DAYS => Self::DueSoon,
            _ => Self::Upcoming,
        }
    }
}

/// A scheduled bill evaluated against a selected period.
///
/// `key` is whatever the caller identifies the bill by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueItem<K> {
    pub key:            K,
    pub next_due_date:  DueDate,
    pub days_until_due: i64,
    pub status:         DueStatus,
    /// Paid for the selected period, or not due until after it
    pub settled:        bool,
}

impl<K> DueItem<K> {
    /// Evaluates a bill for the `selected` period.
    ///
    /// Returns `None` for stopped and on-demand bills, which have no due date.
    pub fn evaluate(
        key: K,
        schedule: &BillSchedule,
        last_paid: Option<CalendarMonth>,
        selected: CalendarMonth,
        has_payment: bool,
        today: DueDate,
    ) -> Option<Self> {
        let next_due_date = schedule.next_due_after_payment(last_paid, selected)?;
        let days_until_due = today.days_until(next_due_date);
        let status = DueStatus::classify(next_due_date, today, selected, has_payment);
        let settled = has_payment || next_due_date.period() > selected;
        debug!("next due {next_due_date} in {days_until_due} days: {status}");

        Some(Self {
            key,
            next_due_date,
            days_until_due,
            status,
            settled,
        })
    }
}

/// Orders items overdue first, then due soon, then upcoming; ties go to the
/// earliest due date.
pub fn sort_due_items<K>(items: &mut [DueItem<K>]) {
    items.sort_by_key(|item| (item.status, item.days_until_due));
}

/// Unsettled items not yet past due, soonest first, at most `limit` of them.
pub fn upcoming<K>(items: impl IntoIterator<Item = DueItem<K>>, limit: usize) -> Vec<DueItem<K>> {
    let mut pending: Vec<DueItem<K>> = items
        .into_iter()
        .filter(|item| !item.settled && item.days_until_due >= 0)
        .collect();
    pending.sort_by_key(|item| item.days_until_due);
    pending.truncate(limit);
    pending
}
