use std::sync::{mpsc::Receiver, RwLock};

use uuid::Uuid;

use super::{poisoned, BudgetBook, BudgetStore, Notifier, StoreEvent};
use crate::{
    errors::Result,
    ledger::{Budget, Expense},
};

/// Process-local store, mostly for tests and previews.
#[derive(Debug, Default)]
pub struct InMemoryBudgetStore {
    book: RwLock<BudgetBook>,
    notifier: Notifier,
}

impl InMemoryBudgetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(book: BudgetBook) -> Self {
        Self {
            book: RwLock::new(book),
            notifier: Notifier::default(),
        }
    }

    pub fn snapshot(&self) -> Result<BudgetBook> {
        Ok(self.book.read().map_err(poisoned)?.clone())
    }

    fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut BudgetBook) -> Result<StoreEvent>,
        value: T,
    ) -> Result<T> {
        let event = {
            let mut book = self.book.write().map_err(poisoned)?;
            apply(&mut book)?
        };
        self.notifier.publish(event);
        Ok(value)
    }
}

impl BudgetStore for InMemoryBudgetStore {
    fn create_budget(&self, budget: Budget) -> Result<Budget> {
        let stored = budget.clone();
        self.mutate(|book| book.insert_budget(stored), budget)
    }

    fn budgets_for_user(&self, user_id: &str) -> Result<Vec<Budget>> {
        Ok(self.book.read().map_err(poisoned)?.budgets_for_user(user_id))
    }

    fn budget(&self, id: Uuid) -> Result<Option<Budget>> {
        Ok(self.book.read().map_err(poisoned)?.budget(id).cloned())
    }

    fn update_budget(&self, budget: Budget) -> Result<Budget> {
        let stored = budget.clone();
        self.mutate(|book| book.replace_budget(stored), budget)
    }

    fn delete_budget(&self, id: Uuid) -> Result<()> {
        self.mutate(|book| book.remove_budget(id), ())
    }

    fn add_expense(&self, expense: Expense) -> Result<Expense> {
        let stored = expense.clone();
        self.mutate(|book| book.insert_expense(stored), expense)
    }

    fn expenses_for_budget(&self, budget_id: Uuid) -> Result<Vec<Expense>> {
        Ok(self
            .book
            .read()
            .map_err(poisoned)?
            .expenses_for_budget(budget_id))
    }

    fn update_expense(&self, expense: Expense) -> Result<Expense> {
        let stored = expense.clone();
        self.mutate(|book| book.replace_expense(stored), expense)
    }

    fn delete_expense(&self, id: Uuid) -> Result<()> {
        self.mutate(|book| book.remove_expense(id), ())
    }

    fn subscribe(&self) -> Receiver<StoreEvent> {
        self.notifier.subscribe()
    }
}
