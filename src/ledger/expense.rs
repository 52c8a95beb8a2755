use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::Instant;

/// A single spend recorded against a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub budget_id: Uuid,
    pub amount: f64,
    pub date: Instant,
    #[serde(default)]
    pub description: String,
}

impl Expense {
    pub fn new(budget_id: Uuid, amount: f64, date: Instant, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            budget_id,
            amount,
            date,
            description: description.into(),
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
