//! Calendar primitives over millisecond instants.
//!
//! Everything here is evaluated in one fixed local offset (no DST rules), on
//! the proleptic Gregorian calendar. All operations are total and pure.

pub mod instant;
pub mod month_view;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc,
    Weekday,
};

pub use instant::{Instant, MILLIS_PER_DAY};

/// Calendar fields of an instant in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub weekday: Weekday,
}

/// A calendar pinned to a single fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Returns `None` for offsets of a day or more in either direction.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        let seconds = minutes.checked_mul(60)?;
        FixedOffset::east_opt(seconds).map(Self::with_offset)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Local wall-clock time of `instant`. Instants outside chrono's range
    /// saturate to its minimum or maximum.
    pub fn local(&self, instant: Instant) -> NaiveDateTime {
        let saturated = if instant.millis() < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        };
        let naive = DateTime::from_timestamp_millis(instant.millis())
            .unwrap_or(saturated)
            .naive_utc();
        naive
            .checked_add_signed(Duration::seconds(self.offset_seconds()))
            .unwrap_or(naive)
    }

    pub fn date_of(&self, instant: Instant) -> NaiveDate {
        self.local(instant).date()
    }

    pub fn fields(&self, instant: Instant) -> CalendarFields {
        let date = self.date_of(instant);
        CalendarFields {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            weekday: date.weekday(),
        }
    }

    /// Instant of `date` at local `time`.
    pub fn instant_at(&self, date: NaiveDate, time: NaiveTime) -> Instant {
        let local = date.and_time(time);
        let utc = local
            .checked_sub_signed(Duration::seconds(self.offset_seconds()))
            .unwrap_or(local);
        Instant::from_millis(utc.and_utc().timestamp_millis())
    }

    pub fn midnight_of(&self, date: NaiveDate) -> Instant {
        self.instant_at(date, NaiveTime::MIN)
    }

    /// Truncates `instant` to local midnight of its own day.
    pub fn start_of_day(&self, instant: Instant) -> Instant {
        self.midnight_of(self.date_of(instant))
    }

    /// Builds a date, pulling `day` back into `1..=days_in_month` instead of
    /// rolling over into the next month. `None` only when `year`/`month` are
    /// outside chrono's range.
    pub fn clamped_date(&self, year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        clamped_date(year, month, day)
    }

    pub fn days_in_month(&self, year: i32, month: u32) -> u32 {
        days_in_month(year, month)
    }

    pub fn is_same_day(&self, a: Instant, b: Instant) -> bool {
        self.date_of(a) == self.date_of(b)
    }

    pub fn is_same_month(&self, a: Instant, b: Instant) -> bool {
        let (a, b) = (self.date_of(a), self.date_of(b));
        a.year() == b.year() && a.month() == b.month()
    }

    fn offset_seconds(&self) -> i64 {
        self.offset.local_minus_utc() as i64
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-based) of `year`; 0 for months outside `1..=12`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = days_in_month(year, month);
    if last == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day.clamp(1, last))
}

/// Moves `date` by `months`, clamping the day to the target month's length.
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let index = date.year() as i64 * 12 + date.month0() as i64 + months as i64;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    i32::try_from(year)
        .ok()
        .and_then(|year| clamped_date(year, month, date.day()))
        .unwrap_or(date)
}
