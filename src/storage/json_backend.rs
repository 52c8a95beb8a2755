use std::{
    fs,
    path::{Path, PathBuf},
    sync::{mpsc::Receiver, Mutex},
};

use tracing::{debug, info};
use uuid::Uuid;

use super::{poisoned, BudgetBook, BudgetStore, Notifier, StoreEvent};
use crate::{
    errors::Result,
    ledger::{Budget, Expense},
    utils::paths::{ensure_dir, resolve_base, store_file_in, write_atomic},
};

/// Store that keeps every budget and expense in one JSON document.
///
/// The document is cached in memory; each mutation is applied to the cache
/// and then written out atomically (temp file + rename). A failed write rolls
/// the cache back so memory and disk never diverge.
#[derive(Debug)]
pub struct JsonBudgetStore {
    path: PathBuf,
    book: Mutex<BudgetBook>,
    notifier: Notifier,
}

impl JsonBudgetStore {
    /// Opens `budgets.json` under `root`, or under the app data directory.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = resolve_base(root);
        ensure_dir(&base)?;
        Self::open(store_file_in(&base))
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    /// Opens the document at `path`, starting empty when it does not exist.
    pub fn open(path: PathBuf) -> Result<Self> {
        let book = if path.exists() {
            load_book_from_path(&path)?
        } else {
            BudgetBook::default()
        };
        info!(
            path = %path.display(),
            budgets = book.budgets.len(),
            expenses = book.expenses.len(),
            "opened budget store"
        );
        Ok(Self {
            path,
            book: Mutex::new(book),
            notifier: Notifier::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut BudgetBook) -> Result<StoreEvent>,
        value: T,
    ) -> Result<T> {
        let event = {
            let mut book = self.book.lock().map_err(poisoned)?;
            let previous = book.clone();
            let event = apply(&mut book)?;
            if let Err(err) = save_book_to_path(&book, &self.path) {
                *book = previous;
                return Err(err);
            }
            event
        };
        debug!(?event, path = %self.path.display(), "persisted budget store");
        self.notifier.publish(event);
        Ok(value)
    }
}

impl BudgetStore for JsonBudgetStore {
    fn create_budget(&self, budget: Budget) -> Result<Budget> {
        let stored = budget.clone();
        self.mutate(|book| book.insert_budget(stored), budget)
    }

    fn budgets_for_user(&self, user_id: &str) -> Result<Vec<Budget>> {
        Ok(self.book.lock().map_err(poisoned)?.budgets_for_user(user_id))
    }

    fn budget(&self, id: Uuid) -> Result<Option<Budget>> {
        Ok(self.book.lock().map_err(poisoned)?.budget(id).cloned())
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
            .lock()
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

pub fn save_book_to_path(book: &BudgetBook, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(book)?;
    write_atomic(path, &json)
}

pub fn load_book_from_path(path: &Path) -> Result<BudgetBook> {
    let data = fs::read_to_string(path)?;
    let book: BudgetBook = serde_json::from_str(&data)?;
    Ok(book)
}
