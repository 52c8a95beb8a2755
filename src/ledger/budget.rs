use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    period::BudgetPeriod,
    recurrence::{NextReset, Occurrences, PeriodWindow, RecurrenceEngine, RecurrenceRule},
};
use crate::{
    calendar::{Calendar, Instant},
    errors::{BudgetError, Result},
};

const DEFAULT_NAME: &str = "My Budget";

/// A spending allowance that resets on a weekly or monthly cadence.
///
/// Values are treated as immutable: the `with_*` helpers return an updated
/// copy. All date questions are delegated to [`RecurrenceEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub amount: f64,
    pub period: BudgetPeriod,
    pub start_date: Instant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Instant>,
    #[serde(default = "default_repeating")]
    pub repeating: bool,
    #[serde(default)]
    pub categories: Vec<BudgetCategory>,
}

fn default_repeating() -> bool {
    true
}

/// A named slice of a budget's amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    /// Packed ARGB color used by presentation layers.
    pub color: u32,
}

impl BudgetCategory {
    pub fn new(name: impl Into<String>, amount: f64, color: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            color,
        }
    }
}

impl Budget {
    /// Starts a draft with the default name and a repeating schedule.
    pub fn draft(
        user_id: impl Into<String>,
        amount: f64,
        period: BudgetPeriod,
        start_date: Instant,
    ) -> BudgetDraft {
        BudgetDraft {
            id: None,
            user_id: user_id.into(),
            name: DEFAULT_NAME.into(),
            amount,
            period,
            start_date,
            end_date: None,
            repeating: true,
            categories: Vec::new(),
        }
    }

    pub fn rule(&self) -> RecurrenceRule {
        RecurrenceRule {
            period: self.period,
            start_date: self.start_date,
            end_date: self.end_date,
            repeating: self.repeating,
        }
    }

    pub fn next_reset(&self, engine: &RecurrenceEngine, from: Instant) -> NextReset {
        engine.next_reset(&self.rule(), from)
    }

    pub fn has_reset(&self, engine: &RecurrenceEngine, now: Instant) -> bool {
        engine.has_reset(&self.rule(), now)
    }

    pub fn has_reset_since(&self, engine: &RecurrenceEngine, last_seen: Instant, now: Instant) -> bool {
        engine.has_reset_since(&self.rule(), last_seen, now)
    }

    pub fn occurrences(&self, engine: &RecurrenceEngine) -> Occurrences {
        engine.occurrences(&self.rule())
    }

    pub fn occurrences_in_range(&self, engine: &RecurrenceEngine, lo: Instant, hi: Instant) -> Vec<Instant> {
        engine.occurrences_in_range(&self.rule(), lo, hi)
    }

    pub fn current_period(&self, engine: &RecurrenceEngine, now: Instant) -> Option<PeriodWindow> {
        engine.current_period(&self.rule(), now)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_period(mut self, period: BudgetPeriod) -> Self {
        self.period = period;
        self
    }

    /// Replaces the schedule. Dates are stored as given; go through
    /// [`Budget::into_draft`] to re-validate and normalize them.
    pub fn with_schedule(mut self, start_date: Instant, end_date: Option<Instant>, repeating: bool) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self.repeating = repeating;
        self
    }

    pub fn with_categories(mut self, categories: Vec<BudgetCategory>) -> Self {
        self.categories = categories;
        self
    }

    /// Reopens the budget for validated edits, keeping its id.
    pub fn into_draft(self) -> BudgetDraft {
        BudgetDraft {
            id: Some(self.id),
            user_id: self.user_id,
            name: self.name,
            amount: self.amount,
            period: self.period,
            start_date: self.start_date,
            end_date: self.end_date,
            repeating: self.repeating,
            categories: self.categories,
        }
    }
}

/// Unvalidated budget input. [`BudgetDraft::build`] is the only path that
/// guarantees the recurrence preconditions.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetDraft {
    id: Option<Uuid>,
    user_id: String,
    name: String,
    amount: f64,
    period: BudgetPeriod,
    start_date: Instant,
    end_date: Option<Instant>,
    repeating: bool,
    categories: Vec<BudgetCategory>,
}

impl BudgetDraft {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    pub fn period(mut self, period: BudgetPeriod) -> Self {
        self.period = period;
        self
    }

    pub fn start_date(mut self, start_date: Instant) -> Self {
        self.start_date = start_date;
        self
    }

    pub fn end_date(mut self, end_date: Option<Instant>) -> Self {
        self.end_date = end_date;
        self
    }

    pub fn repeating(mut self, repeating: bool) -> Self {
        self.repeating = repeating;
        self
    }

    pub fn category(mut self, category: BudgetCategory) -> Self {
        self.categories.push(category);
        self
    }

    /// Validates the draft and snaps both dates to local midnight.
    pub fn build(self, calendar: &Calendar) -> Result<Budget> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(BudgetError::InvalidInput("budget name must not be empty".into()));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(BudgetError::InvalidInput(format!(
                "budget amount must be positive, got {}",
                self.amount
            )));
        }
        if self.start_date < Instant::EPOCH {
            return Err(BudgetError::InvalidInput("start date precedes the epoch".into()));
        }
        if let Some(category) = self
            .categories
            .iter()
            .find(|category| !category.amount.is_finite() || category.amount < 0.0)
        {
            return Err(BudgetError::InvalidInput(format!(
                "category `{}` has an invalid amount",
                category.name
            )));
        }

        let start_date = calendar.start_of_day(self.start_date);
        let end_date = self.end_date.map(|end| calendar.start_of_day(end));
        if let Some(end) = end_date {
            if end < start_date {
                return Err(BudgetError::InvalidInput(
                    "end date must not precede the start date".into(),
                ));
            }
        }

        Ok(Budget {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            user_id: self.user_id,
            name: name.to_string(),
            amount: self.amount,
            period: self.period,
            start_date,
            end_date,
            repeating: self.repeating,
            categories: self.categories,
        })
    }
}
