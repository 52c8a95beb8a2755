use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the budget, store, and configuration layers.
///
/// The recurrence engine itself never fails; only construction, persistence,
/// and configuration surface errors.
#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Budget not found: {0}")]
    BudgetNotFound(Uuid),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(Uuid),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = StdResult<T, BudgetError>;

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}
