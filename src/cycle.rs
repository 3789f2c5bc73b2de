use log::debug;
use serde::{Deserialize, Serialize};

use crate::{CalendarMonth, DueDate, RecurringDay, prelude::*, schedule};

/// How often a bill recurs, in months.
///
/// Serialized as the month count the bill-tracking service stores in
/// `bill_cycle`. `0` marks on-demand bills that have no schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BillCycle {
    #[display(fmt = "on demand")]
    OnDemand,
    #[default]
    #[display(fmt = "monthly")]
    Monthly,
    #[display(fmt = "every 2 months")]
    BiMonthly,
    #[display(fmt = "quarterly")]
    Quarterly,
    #[display(fmt = "every 4 months")]
    FourMonthly,
    #[display(fmt = "every 6 months")]
    SemiAnnual,
    #[display(fmt = "yearly")]
    Annual,
}

/// Error type for bill schedule configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// `bill_cycle` is not one of the supported month counts.
    #[error("Invalid bill cycle: {0} (must be one of 0, 1, 2, 3, 4, 6, 12)")]
    InvalidCycle(u8),
}

impl BillCycle {
    pub const ALL: [Self; 7] = [
        Self::OnDemand,
        Self::Monthly,
        Self::BiMonthly,
        Self::Quarterly,
        Self::FourMonthly,
        Self::SemiAnnual,
        Self::Annual,
    ];

    /// Months between due dates; 0 for on-demand bills.
    pub const fn months(self) -> u8 {
        match self {
            Self::OnDemand => 0,
            Self::Monthly => 1,
            Self::BiMonthly => 2,
            Self::Quarterly => 3,
            Self::FourMonthly => 4,
            Self::SemiAnnual => 6,
            Self::Annual => 12,
        }
    }

    #[inline]
    pub const fn is_recurring(self) -> bool {
        !matches!(self, Self::OnDemand)
    }
}

impl TryFrom<u8> for BillCycle {
    type Error = ScheduleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|cycle| cycle.months() == value)
            .ok_or(ScheduleError::InvalidCycle(value))
    }
}

impl From<BillCycle> for u8 {
    fn from(cycle: BillCycle) -> Self {
        cycle.months()
    }
}

/// When a bill falls due: the `bill_day`, `bill_cycle` and `stopped` flag of
/// a bill type.
///
/// Deserializes straight from a bill-type record; other fields are ignored
/// and missing ones default to an active, monthly, month-end bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BillSchedule {
    #[serde(default)]
    pub bill_day:   RecurringDay,
    #[serde(default)]
    pub bill_cycle: BillCycle,
    /// Stopped bills are kept on record but never fall due
    #[serde(default)]
    pub stopped:    bool,
}

impl BillSchedule {
    pub const fn new(bill_day: RecurringDay, bill_cycle: BillCycle) -> Self {
        Self {
            bill_day,
            bill_cycle,
            stopped: false,
        }
    }

    /// Same schedule, marked stopped
    pub const fn stop(self) -> Self {
        Self {
            stopped: true,
            ..self
        }
    }

    /// Monthly schedule on `bill_day`
    pub const fn monthly(bill_day: RecurringDay) -> Self {
        Self::new(bill_day, BillCycle::Monthly)
    }

    /// Active and on a cadence. Stopped and on-demand bills are not.
    #[inline]
    pub const fn is_recurring(&self) -> bool {
        !self.stopped && self.bill_cycle.is_recurring()
    }

    /// Due date within `period`, regardless of cadence.
    pub fn due_date_in(&self, period: CalendarMonth) -> DueDate {
        schedule::due_date_for_month(period.year(), period.month_typed(), self.bill_day)
    }

    /// Whether `period` is a billing month for a cadence anchored at `anchor`.
    ///
    /// Stopped and on-demand bills are never due. Periods before the anchor
    /// are not due.
    pub fn is_due_in(&self, period: CalendarMonth, anchor: CalendarMonth) -> bool {
        let cycle = i64::from(self.bill_cycle.months());
        if self.stopped || cycle == 0 {
            return false;
        }
        let distance = anchor.months_until(period);
        distance >= 0 && distance % cycle == 0
    }

    /// Next due date given the most recent paid period.
    ///
    /// Without any payment the bill is due in `current`. Otherwise it is due
    /// one cycle after the last paid period. Stopped and on-demand bills have
    /// no due date.
    pub fn next_due_after_payment(
        &self,
        last_paid: Option<CalendarMonth>,
        current: CalendarMonth,
    ) -> Option<DueDate> {
        if !self.is_recurring() {
            return None;
        }

        let period = match last_paid {
            Some(paid) => paid.offset(i64::from(self.bill_cycle.months())),
            None => current,
        };
        debug!(
            "bill {} on day {}: last paid {:?}, next due in {period}",
            self.bill_cycle, self.bill_day, last_paid
        );
        Some(self.due_date_in(period))
    }

    /// Due date to remind about when reminding `days_before` days ahead.
    ///
    /// The target period is the one `today + days_before` falls in, and the
    /// due date is this bill's day within that period. Only active bills with
    /// a fixed bill day get reminders; the cadence is not consulted.
    pub fn reminder_due(&self, today: DueDate, days_before: i64) -> Option<DueDate> {
        if self.stopped || self.bill_day.is_month_end() {
            return None;
        }

        let target = today.add_days(days_before).period();
        debug!("reminding {days_before} days ahead of {today}: checking {target}");
        Some(self.due_date_in(target))
    }
}
