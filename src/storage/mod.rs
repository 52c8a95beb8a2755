pub mod json_backend;
pub mod memory;

use std::sync::{
    mpsc::{self, Receiver, Sender},
    Mutex,
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{BudgetError, Result},
    ledger::{Budget, Expense},
};

pub use json_backend::JsonBudgetStore;
pub use memory::InMemoryBudgetStore;

/// Change notification published after every successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    BudgetCreated(Uuid),
    BudgetUpdated(Uuid),
    BudgetDeleted(Uuid),
    ExpenseAdded { budget_id: Uuid, expense_id: Uuid },
    ExpenseUpdated { budget_id: Uuid, expense_id: Uuid },
    ExpenseDeleted { budget_id: Uuid, expense_id: Uuid },
}

/// Persistence boundary for budgets and their expenses.
///
/// Budgets handed to the store are expected to come out of
/// [`BudgetDraft::build`](crate::ledger::BudgetDraft::build).
pub trait BudgetStore: Send + Sync {
    fn create_budget(&self, budget: Budget) -> Result<Budget>;
    fn budgets_for_user(&self, user_id: &str) -> Result<Vec<Budget>>;
    fn budget(&self, id: Uuid) -> Result<Option<Budget>>;
    fn update_budget(&self, budget: Budget) -> Result<Budget>;
    /// Removes the budget together with all of its expenses.
    fn delete_budget(&self, id: Uuid) -> Result<()>;

    fn add_expense(&self, expense: Expense) -> Result<Expense>;
    fn expenses_for_budget(&self, budget_id: Uuid) -> Result<Vec<Expense>>;
    fn update_expense(&self, expense: Expense) -> Result<Expense>;
    fn delete_expense(&self, id: Uuid) -> Result<()>;

    /// Registers a listener; it receives every event published afterwards.
    fn subscribe(&self) -> Receiver<StoreEvent>;

    fn total_expense_for_budget(&self, budget_id: Uuid) -> Result<f64> {
        Ok(self
            .expenses_for_budget(budget_id)?
            .iter()
            .map(|expense| expense.amount)
            .sum())
    }

    fn budget_with_expenses(&self, budget_id: Uuid) -> Result<(Budget, Vec<Expense>)> {
        let budget = self
            .budget(budget_id)?
            .ok_or(BudgetError::BudgetNotFound(budget_id))?;
        let expenses = self.expenses_for_budget(budget_id)?;
        Ok((budget, expenses))
    }
}

/// Plain collection both stores operate on; also the JSON file layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetBook {
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl BudgetBook {
    pub fn insert_budget(&mut self, budget: Budget) -> Result<StoreEvent> {
        if self.budgets.iter().any(|existing| existing.id == budget.id) {
            return Err(BudgetError::InvalidInput(format!(
                "budget {} already exists",
                budget.id
            )));
        }
        let event = StoreEvent::BudgetCreated(budget.id);
        self.budgets.push(budget);
        Ok(event)
    }

    pub fn budgets_for_user(&self, user_id: &str) -> Vec<Budget> {
        self.budgets
            .iter()
            .filter(|budget| budget.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn budget(&self, id: Uuid) -> Option<&Budget> {
        self.budgets.iter().find(|budget| budget.id == id)
    }

    pub fn replace_budget(&mut self, budget: Budget) -> Result<StoreEvent> {
        let slot = self
            .budgets
            .iter_mut()
            .find(|existing| existing.id == budget.id)
            .ok_or(BudgetError::BudgetNotFound(budget.id))?;
        let event = StoreEvent::BudgetUpdated(budget.id);
        *slot = budget;
        Ok(event)
    }

    pub fn remove_budget(&mut self, id: Uuid) -> Result<StoreEvent> {
        let before = self.budgets.len();
        self.budgets.retain(|budget| budget.id != id);
        if self.budgets.len() == before {
            return Err(BudgetError::BudgetNotFound(id));
        }
        self.expenses.retain(|expense| expense.budget_id != id);
        Ok(StoreEvent::BudgetDeleted(id))
    }

    pub fn insert_expense(&mut self, expense: Expense) -> Result<StoreEvent> {
        if self.budget(expense.budget_id).is_none() {
            return Err(BudgetError::BudgetNotFound(expense.budget_id));
        }
        if !expense.amount.is_finite() {
            return Err(BudgetError::InvalidInput(
                "expense amount must be a finite number".into(),
            ));
        }
        let event = StoreEvent::ExpenseAdded {
            budget_id: expense.budget_id,
            expense_id: expense.id,
        };
        self.expenses.push(expense);
        Ok(event)
    }

    pub fn expenses_for_budget(&self, budget_id: Uuid) -> Vec<Expense> {
        self.expenses
            .iter()
            .filter(|expense| expense.budget_id == budget_id)
            .cloned()
            .collect()
    }

    pub fn replace_expense(&mut self, expense: Expense) -> Result<StoreEvent> {
        let slot = self
            .expenses
            .iter_mut()
            .find(|existing| existing.id == expense.id)
            .ok_or(BudgetError::ExpenseNotFound(expense.id))?;
        let event = StoreEvent::ExpenseUpdated {
            budget_id: expense.budget_id,
            expense_id: expense.id,
        };
        *slot = expense;
        Ok(event)
    }

    pub fn remove_expense(&mut self, id: Uuid) -> Result<StoreEvent> {
        let index = self
            .expenses
            .iter()
            .position(|expense| expense.id == id)
            .ok_or(BudgetError::ExpenseNotFound(id))?;
        let removed = self.expenses.remove(index);
        Ok(StoreEvent::ExpenseDeleted {
            budget_id: removed.budget_id,
            expense_id: removed.id,
        })
    }
}

/// Fan-out of store events to subscribed channels. Disconnected receivers
/// are dropped on the next publish.
#[derive(Debug, Default)]
pub struct Notifier {
    senders: Mutex<Vec<Sender<StoreEvent>>>,
}

impl Notifier {
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        let mut senders = self
            .senders
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        senders.push(tx);
        rx
    }

    pub fn publish(&self, event: StoreEvent) {
        let mut senders = self
            .senders
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        senders.retain(|sender| sender.send(event).is_ok());
        tracing::trace!(?event, listeners = senders.len(), "published store event");
    }
}

fn poisoned<T>(_: T) -> BudgetError {
    BudgetError::StorageError("store lock poisoned".into())
}
