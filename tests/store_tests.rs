mod common;

use budget_cadence::{
    errors::BudgetError,
    ledger::{BudgetPeriod, Expense},
    storage::{BudgetStore, InMemoryBudgetStore, JsonBudgetStore, StoreEvent},
};
use common::{budget, temp_json_store, utc_day};
use uuid::Uuid;

fn exercise_store(store: &dyn BudgetStore) {
    let events = store.subscribe();

    let rent = store
        .create_budget(budget(BudgetPeriod::Monthly, utc_day(2025, 1, 1)).with_name("Rent"))
        .expect("create rent");
    let food = store
        .create_budget(budget(BudgetPeriod::Weekly, utc_day(2025, 1, 6)).with_name("Food"))
        .expect("create food");
    assert_eq!(store.budgets_for_user("user-1").unwrap().len(), 2);
    assert!(store.budgets_for_user("someone-else").unwrap().is_empty());

    let lunch = store
        .add_expense(Expense::new(food.id, 12.5, utc_day(2025, 1, 7), "lunch"))
        .expect("add lunch");
    store
        .add_expense(Expense::new(food.id, 30.0, utc_day(2025, 1, 9), "market"))
        .expect("add market");
    assert_eq!(store.total_expense_for_budget(food.id).unwrap(), 42.5);

    let cheaper = store
        .update_expense(lunch.clone().with_amount(10.0))
        .expect("update lunch");
    assert_eq!(cheaper.id, lunch.id);
    assert_eq!(store.total_expense_for_budget(food.id).unwrap(), 40.0);

    let renamed = store
        .update_budget(rent.clone().with_name("Apartment"))
        .expect("rename");
    let (loaded, expenses) = store.budget_with_expenses(rent.id).expect("rent exists");
    assert_eq!(loaded, renamed);
    assert!(expenses.is_empty());

    store.delete_budget(food.id).expect("delete food");
    assert_eq!(store.budget(food.id).unwrap(), None);
    assert!(store.expenses_for_budget(food.id).unwrap().is_empty());

    let received: Vec<StoreEvent> = events.try_iter().collect();
    assert_eq!(received.first(), Some(&StoreEvent::BudgetCreated(rent.id)));
    assert_eq!(received.last(), Some(&StoreEvent::BudgetDeleted(food.id)));
    assert_eq!(received.len(), 7);
}

fn exercise_missing_ids(store: &dyn BudgetStore) {
    let ghost = Uuid::new_v4();
    assert!(matches!(
        store.delete_budget(ghost),
        Err(BudgetError::BudgetNotFound(id)) if id == ghost
    ));
    assert!(matches!(
        store.add_expense(Expense::new(ghost, 1.0, utc_day(2025, 1, 1), "")),
        Err(BudgetError::BudgetNotFound(_))
    ));
    assert!(matches!(
        store.delete_expense(ghost),
        Err(BudgetError::ExpenseNotFound(_))
    ));
    let orphan = budget(BudgetPeriod::Weekly, utc_day(2025, 1, 1));
    assert!(matches!(
        store.update_budget(orphan.clone()),
        Err(BudgetError::BudgetNotFound(_))
    ));
    store.create_budget(orphan.clone()).unwrap();
    assert!(matches!(
        store.create_budget(orphan),
        Err(BudgetError::InvalidInput(_))
    ));
}

#[test]
fn in_memory_store_crud_and_notifications() {
    let store = InMemoryBudgetStore::new();
    exercise_store(&store);
}

#[test]
fn json_store_crud_and_notifications() {
    let (store, _) = temp_json_store();
    exercise_store(&store);
}

#[test]
fn stores_reject_unknown_ids() {
    exercise_missing_ids(&InMemoryBudgetStore::new());
    let (store, _) = temp_json_store();
    exercise_missing_ids(&store);
}

#[test]
fn json_store_persists_across_reopen() {
    let (store, base) = temp_json_store();
    let saved = store
        .create_budget(budget(BudgetPeriod::Monthly, utc_day(2025, 2, 28)))
        .unwrap();
    store
        .add_expense(Expense::new(saved.id, 99.0, utc_day(2025, 3, 2), "utilities"))
        .unwrap();
    drop(store);

    let reopened = JsonBudgetStore::new(Some(base)).unwrap();
    assert_eq!(reopened.budget(saved.id).unwrap(), Some(saved.clone()));
    let expenses = reopened.expenses_for_budget(saved.id).unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].description, "utilities");
}

#[test]
fn dropped_subscribers_do_not_block_publishing() {
    let store = InMemoryBudgetStore::new();
    drop(store.subscribe());
    let live = store.subscribe();
    let created = store
        .create_budget(budget(BudgetPeriod::Weekly, utc_day(2025, 1, 1)))
        .unwrap();
    assert_eq!(live.try_recv().unwrap(), StoreEvent::BudgetCreated(created.id));
}
