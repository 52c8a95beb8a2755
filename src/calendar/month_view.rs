use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

use super::{shift_months, Calendar, Instant};

/// Number of cells in a month grid: six full weeks.
pub const MONTH_GRID_DAYS: usize = 42;

impl Calendar {
    /// Local midnight on the first day of the month containing `instant`.
    pub fn first_day_of_month(&self, instant: Instant) -> Instant {
        self.midnight_of(first_of_month(self.date_of(instant)))
    }

    /// Last millisecond of the month containing `instant`.
    pub fn last_day_of_month(&self, instant: Instant) -> Instant {
        let next = shift_months(first_of_month(self.date_of(instant)), 1);
        self.midnight_of(next).add_millis(-1)
    }

    /// Moves `instant` by whole months keeping its local time of day. Days that
    /// do not exist in the target month clamp to its last day.
    pub fn shift_months(&self, instant: Instant, months: i32) -> Instant {
        let local = self.local(instant);
        let date = shift_months(local.date(), months);
        self.instant_at(date, local.time())
    }

    /// The 42 local midnights that cover the month containing `instant`,
    /// starting on the most recent `first_weekday` on or before day 1.
    pub fn month_grid(&self, instant: Instant, first_weekday: Weekday) -> Vec<Instant> {
        let first = first_of_month(self.date_of(instant));
        let lead = days_since(first.weekday(), first_weekday);
        let mut cursor = first - Duration::days(lead);
        let mut cells = Vec::with_capacity(MONTH_GRID_DAYS);
        for _ in 0..MONTH_GRID_DAYS {
            cells.push(self.instant_at(cursor, NaiveTime::MIN));
            cursor = match cursor.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        cells
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn days_since(day: Weekday, start: Weekday) -> i64 {
    let diff = day.num_days_from_monday() as i64 - start.num_days_from_monday() as i64;
    diff.rem_euclid(7)
}
