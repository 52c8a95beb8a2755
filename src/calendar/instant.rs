use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Milliseconds since the Unix epoch.
///
/// Instants are the interchange format with persistence; calendar meaning is
/// only attached through a [`Calendar`](super::Calendar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instant(i64);

impl Instant {
    pub const EPOCH: Instant = Instant(0);

    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn millis(self) -> i64 {
        self.0
    }

    pub fn add_millis(self, delta: i64) -> Self {
        Self(self.0.saturating_add(delta))
    }

    pub fn add_days(self, days: i64) -> Self {
        self.add_millis(days.saturating_mul(MILLIS_PER_DAY))
    }

    pub fn from_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Self {
        Self(datetime.timestamp_millis())
    }

    /// `None` when the instant lies outside chrono's representable range.
    pub fn to_utc(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl From<DateTime<Utc>> for Instant {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::from_datetime(&datetime)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_utc() {
            Some(datetime) => write!(f, "{}", datetime.to_rfc3339()),
            None => write!(f, "{}ms", self.0),
        }
    }
}
