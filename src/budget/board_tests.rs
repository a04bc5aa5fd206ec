#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::models::{
    ExpensePatch, Income, IncomePatch, NewExpense, NewIncome, NewWishlistItem, Purchase, Savings,
    WishlistItem, WishlistPatch,
};
use crate::store::{MemoryStore, StoreError};

fn march() -> MonthKey {
    MonthKey::new(2024, 3).unwrap()
}

fn seeded() -> MemoryStore {
    let mut store = MemoryStore::new(Category::defaults());
    for (amount, category, date) in [
        ("50", "Food", "2024-03-05"),
        ("30", "Food", "2024-03-20"),
        ("100", "Car", "2024-02-28"),
    ] {
        let form = NewExpense::parse(amount, category, date, "").unwrap();
        store.create_expense(&form).unwrap();
    }
    store
        .upsert_budget(&CategoryBudget::new(1, march(), Some(dec!(100))))
        .unwrap();
    store
}

fn board(store: &MemoryStore) -> BudgetBoard {
    let mut board = BudgetBoard::new(march());
    board.refresh(store);
    board
}

fn food(board: &BudgetBoard) -> BudgetRow {
    board
        .rows()
        .into_iter()
        .find(|r| r.category == "Food")
        .unwrap()
}

/// Wraps a real store but fails the selected operations.
struct FailingStore {
    inner: MemoryStore,
    fail_reads: bool,
    fail_writes: bool,
}

impl FailingStore {
    fn err() -> StoreError {
        StoreError::Unavailable("connection refused".into())
    }

    fn read<T>(&self, value: Result<T, StoreError>) -> Result<T, StoreError> {
        if self.fail_reads {
            Err(Self::err())
        } else {
            value
        }
    }

    fn write<T>(
        &mut self,
        op: impl FnOnce(&mut MemoryStore) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        if self.fail_writes {
            Err(Self::err())
        } else {
            op(&mut self.inner)
        }
    }
}

impl Store for FailingStore {
    fn categories(&self) -> Result<Vec<Category>, StoreError> {
        self.read(self.inner.categories())
    }

    fn expenses(&self) -> Result<Vec<Expense>, StoreError> {
        self.read(self.inner.expenses())
    }

    fn incomes(&self) -> Result<Vec<Income>, StoreError> {
        self.read(self.inner.incomes())
    }

    fn wishlist(&self) -> Result<Vec<WishlistItem>, StoreError> {
        self.read(self.inner.wishlist())
    }

    fn budgets(&self, month: MonthKey) -> Result<Vec<CategoryBudget>, StoreError> {
        self.read(self.inner.budgets(month))
    }

    fn upsert_budget(&mut self, budget: &CategoryBudget) -> Result<CategoryBudget, StoreError> {
        self.write(|s| s.upsert_budget(budget))
    }

    fn savings(&self, month: MonthKey) -> Result<Option<Savings>, StoreError> {
        self.read(self.inner.savings(month))
    }

    fn savings_history(&self) -> Result<Vec<Savings>, StoreError> {
        self.read(self.inner.savings_history())
    }

    fn upsert_savings(&mut self, savings: &Savings) -> Result<Savings, StoreError> {
        self.write(|s| s.upsert_savings(savings))
    }

    fn create_expense(&mut self, expense: &NewExpense) -> Result<Expense, StoreError> {
        self.write(|s| s.create_expense(expense))
    }

    fn update_expense(&mut self, id: i64, patch: &ExpensePatch) -> Result<Expense, StoreError> {
        self.write(|s| s.update_expense(id, patch))
    }

    fn delete_expense(&mut self, id: i64) -> Result<(), StoreError> {
        self.write(|s| s.delete_expense(id))
    }

    fn create_income(&mut self, income: &NewIncome) -> Result<Income, StoreError> {
        self.write(|s| s.create_income(income))
    }

    fn update_income(&mut self, id: i64, patch: &IncomePatch) -> Result<Income, StoreError> {
        self.write(|s| s.update_income(id, patch))
    }

    fn delete_income(&mut self, id: i64) -> Result<(), StoreError> {
        self.write(|s| s.delete_income(id))
    }

    fn create_wishlist_item(
        &mut self,
        item: &NewWishlistItem,
    ) -> Result<WishlistItem, StoreError> {
        self.write(|s| s.create_wishlist_item(item))
    }

    fn update_wishlist_item(
        &mut self,
        id: i64,
        patch: &WishlistPatch,
    ) -> Result<WishlistItem, StoreError> {
        self.write(|s| s.update_wishlist_item(id, patch))
    }

    fn delete_wishlist_item(&mut self, id: i64) -> Result<(), StoreError> {
        self.write(|s| s.delete_wishlist_item(id))
    }

    fn purchase_wishlist_item(
        &mut self,
        id: i64,
        purchase: &Purchase,
    ) -> Result<Expense, StoreError> {
        self.write(|s| s.purchase_wishlist_item(id, purchase))
    }

    fn create_category(&mut self, category: &Category) -> Result<Category, StoreError> {
        self.write(|s| s.create_category(category))
    }

    fn delete_category(&mut self, id: i64) -> Result<(), StoreError> {
        self.write(|s| s.delete_category(id))
    }
}

// ── refresh ───────────────────────────────────────────────────

#[test]
fn test_refresh_loads_rows_and_drafts() {
    let store = seeded();
    let mut board = board(&store);

    let row = food(&board);
    assert_eq!(row.spent, dec!(80));
    assert_eq!(row.remaining, Some(dec!(20)));
    assert_eq!(board.draft(1), "100");
    assert_eq!(board.draft(12), "");
    assert!(board.take_notices().is_empty());
}

#[test]
fn test_refresh_failure_keeps_previous_state() {
    let mut failing = FailingStore {
        inner: seeded(),
        fail_reads: false,
        fail_writes: false,
    };
    let mut board = BudgetBoard::new(march());
    board.refresh(&failing);
    let before = board.rows();

    failing.fail_reads = true;
    board.refresh(&failing);

    assert_eq!(board.rows(), before);
    let messages: Vec<String> = board
        .take_notices()
        .into_iter()
        .map(|n| {
            assert_eq!(n.level, NoticeLevel::Error);
            n.message
        })
        .collect();
    assert_eq!(
        messages,
        vec![
            "Failed to load expenses.",
            "Failed to load categories.",
            "Failed to load budgets.",
        ]
    );
    assert!(board.take_notices().is_empty());
}

#[test]
fn test_set_month_reloads_budgets() {
    let mut store = seeded();
    store
        .upsert_budget(&CategoryBudget::new(1, march().shift(1), Some(dec!(60))))
        .unwrap();
    let mut board = board(&store);

    board.set_month(&store, march().shift(1));
    assert_eq!(board.month(), march().shift(1));
    assert_eq!(board.draft(1), "60");
    let row = food(&board);
    assert_eq!(row.spent, dec!(0));
    assert_eq!(row.budget, Some(dec!(60)));
}

#[test]
fn test_set_month_without_budget_starts_clean() {
    let mut store = seeded();
    let mut board = board(&store);
    assert_eq!(board.draft(1), "100");

    let april = march().shift(1);
    board.set_month(&store, april);

    assert_eq!(board.draft(1), "");
    assert!(!board.is_dirty(1));
    assert!(board.save_budget(&mut store, 1).unwrap().is_none());
    assert!(store.budgets(april).unwrap().is_empty());
    assert!(board.take_notices().is_empty());
}

#[test]
fn test_set_month_drops_unsaved_edit() {
    let mut store = seeded();
    let mut board = board(&store);
    board.edit_draft(12, "75");

    board.set_month(&store, march().shift(1));
    assert_eq!(board.draft(12), "");
    assert!(board.save_budget(&mut store, 12).unwrap().is_none());
}

#[test]
fn test_sort_applies_to_rows() {
    let store = seeded();
    let mut board = board(&store);
    board.set_sort(SortKey::Spent);
    assert_eq!(board.sort(), SortKey::Spent);
    assert_eq!(board.rows()[0].category, "Food");
}

// ── save_budget ───────────────────────────────────────────────

#[test]
fn test_save_budget_commits_and_merges() {
    let mut store = seeded();
    let mut board = board(&store);

    board.edit_draft(12, "250");
    assert!(board.is_dirty(12));
    let saved = board.save_budget(&mut store, 12).unwrap().unwrap();

    assert_eq!(saved.amount, Some(dec!(250)));
    assert!(!board.is_dirty(12));
    assert_eq!(board.budgets().len(), 2);
    let car = board.rows().into_iter().find(|r| r.category == "Car").unwrap();
    assert_eq!(car.budget, Some(dec!(250)));

    let notices = board.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(notices[0].message, "Budget saved.");
}

#[test]
fn test_save_budget_replaces_existing_entry() {
    let mut store = seeded();
    let mut board = board(&store);

    board.edit_draft(1, "150");
    board.save_budget(&mut store, 1).unwrap();
    assert_eq!(board.budgets().len(), 1);
    assert_eq!(food(&board).remaining, Some(dec!(70)));
}

#[test]
fn test_save_budget_zero_stores_null() {
    let mut store = seeded();
    let mut board = board(&store);

    board.edit_draft(1, "0");
    let saved = board.save_budget(&mut store, 1).unwrap().unwrap();

    assert_eq!(saved.amount, None);
    assert_eq!(store.budgets(march()).unwrap()[0].amount, None);
    assert_eq!(board.draft(1), "");
    let row = food(&board);
    assert_eq!(row.budget, None);
    assert!(!row.is_over_budget);
}

#[test]
fn test_save_budget_clean_draft_is_noop() {
    let mut store = seeded();
    let mut board = board(&store);
    assert!(board.save_budget(&mut store, 1).unwrap().is_none());
    assert!(board.take_notices().is_empty());
}

#[test]
fn test_save_budget_invalid_sends_nothing() {
    let mut store = FailingStore {
        inner: seeded(),
        fail_reads: false,
        fail_writes: false,
    };
    let mut board = BudgetBoard::new(march());
    board.refresh(&store);

    board.edit_draft(1, "-20");
    let err = board.save_budget(&mut store, 1).unwrap_err();

    assert!(err.is_validation());
    assert_eq!(store.inner.budgets[0].amount, Some(dec!(100)));
    assert_eq!(food(&board).budget, Some(dec!(100)));
    assert!(board.is_dirty(1));
    let notices = board.take_notices();
    assert_eq!(notices[0].message, "Enter a valid non-negative budget.");
}

#[test]
fn test_save_budget_write_failure_leaves_state() {
    let mut store = FailingStore {
        inner: seeded(),
        fail_reads: false,
        fail_writes: true,
    };
    let mut board = BudgetBoard::new(march());
    board.refresh(&store);

    board.edit_draft(1, "300");
    let err = board.save_budget(&mut store, 1).unwrap_err();

    assert!(matches!(err, BudgetError::Write { what: "budget", .. }));
    assert_eq!(food(&board).budget, Some(dec!(100)));
    assert_eq!(board.draft(1), "300");
    let notices = board.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, "Failed to update budget.");
}

#[test]
fn test_save_then_refresh_keeps_committed_value() {
    let mut store = seeded();
    let mut board = board(&store);
    board.edit_draft(1, "90.50");
    board.save_budget(&mut store, 1).unwrap();

    board.refresh(&store);
    assert_eq!(board.draft(1), "90.5");
    assert_eq!(food(&board).budget, Some(dec!(90.50)));
}
