//! Budget domain models and the reset schedule behind them.

pub mod budget;
pub mod expense;
pub mod period;
pub mod recurrence;
pub mod summary;

pub use budget::{Budget, BudgetCategory, BudgetDraft};
pub use expense::Expense;
pub use period::{BudgetPeriod, Candidate, Phase};
pub use recurrence::{NextReset, Occurrences, PeriodWindow, RecurrenceEngine, RecurrenceRule};
pub use summary::{reset_markers, BudgetSummary, ResetMarker};
