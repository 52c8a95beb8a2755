#![allow(dead_code)]

use std::sync::Mutex;

use budget_cadence::{
    calendar::{Calendar, Instant},
    ledger::{Budget, BudgetPeriod, RecurrenceEngine},
    storage::JsonBudgetStore,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn utc_engine() -> RecurrenceEngine {
    RecurrenceEngine::new(Calendar::utc())
}

/// Local midnight of the given date in `calendar`.
pub fn day(calendar: &Calendar, y: i32, m: u32, d: u32) -> Instant {
    calendar.midnight_of(NaiveDate::from_ymd_opt(y, m, d).expect("valid test date"))
}

pub fn utc_day(y: i32, m: u32, d: u32) -> Instant {
    day(&Calendar::utc(), y, m, d)
}

pub fn budget(period: BudgetPeriod, start: Instant) -> Budget {
    Budget::draft("user-1", 300.0, period, start)
        .build(&Calendar::utc())
        .expect("valid budget")
}

/// Creates a JSON store backed by a unique directory for each test.
pub fn temp_json_store() -> (JsonBudgetStore, std::path::PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    let store = JsonBudgetStore::new(Some(base.clone())).expect("create json store");
    (store, base)
}
