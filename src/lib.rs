#![doc(test(attr(deny(warnings))))]

//! Budget Cadence computes when weekly and monthly budgets reset.
//!
//! The recurrence engine in [`ledger`] is a pure function of a budget's
//! `{period, start_date, end_date, repeating}` and reference instants. The
//! [`storage`] and [`config`] modules provide the persistence boundary and
//! user preferences around it.

pub mod calendar;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use calendar::{Calendar, Instant};
pub use errors::{BudgetError, Result};
pub use ledger::{Budget, BudgetPeriod, NextReset, RecurrenceEngine, RecurrenceRule};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Cadence tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
