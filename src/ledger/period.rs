use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar::{clamped_date, shift_months, Calendar, Instant};

/// Cadence on which a budget resets. The phase (weekday or day of month)
/// always comes from the budget's start date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
}

/// Whether a candidate is the first reset after the anchor or a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    First,
    Steady,
}

/// A calendar-aligned reset date produced by a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub date: NaiveDate,
    pub phase: Phase,
}

impl BudgetPeriod {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "Weekly",
            BudgetPeriod::Monthly => "Monthly",
        }
    }

    /// Shortest possible distance between two unclamped resets.
    pub fn min_length_days(&self) -> i64 {
        match self {
            BudgetPeriod::Weekly => 7,
            BudgetPeriod::Monthly => 28,
        }
    }

    /// Next reset date aligned with `anchor`'s phase, relative to `from`.
    ///
    /// While `from` has not passed the anchor the first reset is exactly one
    /// period after the anchor. Afterwards the candidate is the first aligned
    /// date strictly after `from`'s local day: landing on the aligned day
    /// itself counts as already passed.
    pub fn next_candidate(&self, calendar: &Calendar, anchor: Instant, from: Instant) -> Candidate {
        let anchor_date = calendar.date_of(anchor);
        if from <= anchor {
            return Candidate {
                date: self.first_after(anchor_date),
                phase: Phase::First,
            };
        }
        Candidate {
            date: self.steady_after(anchor_date, calendar.date_of(from)),
            phase: Phase::Steady,
        }
    }

    fn first_after(&self, anchor: NaiveDate) -> NaiveDate {
        match self {
            BudgetPeriod::Weekly => add_days(anchor, 7),
            BudgetPeriod::Monthly => shift_months(anchor, 1),
        }
    }

    fn steady_after(&self, anchor: NaiveDate, from: NaiveDate) -> NaiveDate {
        match self {
            BudgetPeriod::Weekly => {
                let candidate = add_days(from, days_until(from.weekday(), anchor.weekday()));
                if from >= candidate {
                    add_days(candidate, 7)
                } else {
                    candidate
                }
            }
            BudgetPeriod::Monthly => {
                let target_day = anchor.day();
                let this_month = month_target(from, target_day);
                if from >= this_month {
                    // Clamp again for the next month; its length may differ.
                    month_target(shift_months(first_of_month(from), 1), target_day)
                } else {
                    this_month
                }
            }
        }
    }
}

/// `target_day` in `date`'s month, pulled back to the month's last day when
/// the month is shorter.
fn month_target(date: NaiveDate, target_day: u32) -> NaiveDate {
    clamped_date(date.year(), date.month(), target_day).unwrap_or(date)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn days_until(from: Weekday, target: Weekday) -> i64 {
    let diff = target.num_days_from_monday() as i64 - from.num_days_from_monday() as i64;
    diff.rem_euclid(7)
}

fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(NaiveDate::MAX)
}
