use uuid::Uuid;

use super::{
    budget::Budget,
    expense::Expense,
    recurrence::{NextReset, PeriodWindow, RecurrenceEngine},
};
use crate::calendar::Instant;

/// Spending snapshot for one budget at a reference instant.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSummary {
    pub budget_id: Uuid,
    pub total_spent: f64,
    pub remaining: f64,
    pub percent_used: f64,
    pub over_budget: bool,
    /// Spend inside the period containing the reference instant.
    pub period_spent: f64,
    pub period: Option<PeriodWindow>,
    pub next_reset: NextReset,
    /// Expenses belonging to the budget, newest first.
    pub expenses: Vec<Expense>,
}

impl BudgetSummary {
    pub fn compute(
        budget: &Budget,
        expenses: &[Expense],
        engine: &RecurrenceEngine,
        now: Instant,
    ) -> Self {
        let mut owned: Vec<Expense> = expenses
            .iter()
            .filter(|expense| expense.budget_id == budget.id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.date.cmp(&a.date));

        let total_spent: f64 = owned.iter().map(|expense| expense.amount).sum();
        let period = budget.current_period(engine, now);
        let period_spent = match period {
            Some(window) => owned
                .iter()
                .filter(|expense| window.contains(expense.date))
                .map(|expense| expense.amount)
                .sum(),
            None => 0.0,
        };
        let percent_used = if budget.amount > 0.0 {
            total_spent / budget.amount * 100.0
        } else {
            0.0
        };

        Self {
            budget_id: budget.id,
            total_spent,
            remaining: budget.amount - total_spent,
            percent_used,
            over_budget: total_spent > budget.amount,
            period_spent,
            period,
            next_reset: budget.next_reset(engine, now),
            expenses: owned,
        }
    }
}

/// A budget reset that falls inside a displayed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetMarker {
    pub budget_id: Uuid,
    pub at: Instant,
}

/// Every reset of every budget within `[lo, hi]`, ordered by instant.
pub fn reset_markers(
    budgets: &[Budget],
    engine: &RecurrenceEngine,
    lo: Instant,
    hi: Instant,
) -> Vec<ResetMarker> {
    let mut markers: Vec<ResetMarker> = budgets
        .iter()
        .flat_map(|budget| {
            budget
                .occurrences_in_range(engine, lo, hi)
                .into_iter()
                .map(move |at| ResetMarker {
                    budget_id: budget.id,
                    at,
                })
        })
        .collect();
    markers.sort_by_key(|marker| marker.at);
    markers
}
