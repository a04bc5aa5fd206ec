mod snapshot;

use thiserror::Error;

use crate::models::*;

pub(crate) use snapshot::Snapshot;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} with this name already exists")]
    Duplicate(&'static str),

    #[error("{0}")]
    Unavailable(String),
}

/// The finance backend as seen by this client: collection reads, the
/// per-month upserts for budgets and savings, and record edits.
pub(crate) trait Store {
    fn categories(&self) -> Result<Vec<Category>, StoreError>;
    fn expenses(&self) -> Result<Vec<Expense>, StoreError>;
    fn incomes(&self) -> Result<Vec<Income>, StoreError>;
    fn wishlist(&self) -> Result<Vec<WishlistItem>, StoreError>;

    /// Budgets for the month whose first day is `month.as_param()`.
    fn budgets(&self, month: MonthKey) -> Result<Vec<CategoryBudget>, StoreError>;

    /// Create or replace the budget for `(category_id, month)`.
    fn upsert_budget(&mut self, budget: &CategoryBudget) -> Result<CategoryBudget, StoreError>;

    fn savings(&self, month: MonthKey) -> Result<Option<Savings>, StoreError>;
    fn savings_history(&self) -> Result<Vec<Savings>, StoreError>;
    fn upsert_savings(&mut self, savings: &Savings) -> Result<Savings, StoreError>;

    fn create_expense(&mut self, expense: &NewExpense) -> Result<Expense, StoreError>;
    fn update_expense(&mut self, id: i64, patch: &ExpensePatch) -> Result<Expense, StoreError>;
    fn delete_expense(&mut self, id: i64) -> Result<(), StoreError>;

    fn create_income(&mut self, income: &NewIncome) -> Result<Income, StoreError>;
    fn update_income(&mut self, id: i64, patch: &IncomePatch) -> Result<Income, StoreError>;
    fn delete_income(&mut self, id: i64) -> Result<(), StoreError>;

    fn create_wishlist_item(&mut self, item: &NewWishlistItem)
        -> Result<WishlistItem, StoreError>;
    fn update_wishlist_item(
        &mut self,
        id: i64,
        patch: &WishlistPatch,
    ) -> Result<WishlistItem, StoreError>;
    fn delete_wishlist_item(&mut self, id: i64) -> Result<(), StoreError>;

    /// Record the item as an expense and take it off the wishlist. Nothing
    /// changes when either step fails.
    fn purchase_wishlist_item(
        &mut self,
        id: i64,
        purchase: &Purchase,
    ) -> Result<Expense, StoreError>;

    /// Add a custom category. Names are unique, ignoring case.
    fn create_category(&mut self, category: &Category) -> Result<Category, StoreError>;

    /// Remove a custom category along with its budgets. Seeded categories
    /// cannot be deleted.
    fn delete_category(&mut self, id: i64) -> Result<(), StoreError>;
}

/// In-process store holding every collection in memory.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryStore {
    pub(crate) categories: Vec<Category>,
    pub(crate) expenses: Vec<Expense>,
    pub(crate) budgets: Vec<CategoryBudget>,
    pub(crate) incomes: Vec<Income>,
    pub(crate) savings: Vec<Savings>,
    pub(crate) wishlist: Vec<WishlistItem>,
}

impl MemoryStore {
    pub(crate) fn new(categories: Vec<Category>) -> Self {
        Self {
            categories,
            ..Self::default()
        }
    }
}

fn next_id(ids: impl Iterator<Item = Option<i64>>) -> i64 {
    ids.flatten().max().unwrap_or(0) + 1
}

/// Remove the record with `id`, or report `what` as missing.
fn remove_by_id<T>(
    records: &mut Vec<T>,
    id: i64,
    record_id: impl Fn(&T) -> Option<i64>,
    what: &'static str,
) -> Result<T, StoreError> {
    let pos = records
        .iter()
        .position(|r| record_id(r) == Some(id))
        .ok_or(StoreError::NotFound(what))?;
    Ok(records.remove(pos))
}

impl MemoryStore {
    fn category_named(&self, name: &str) -> Result<&Category, StoreError> {
        Category::find_by_name(&self.categories, name).ok_or(StoreError::NotFound("Category"))
    }
}

impl Store for MemoryStore {
    fn categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.categories.clone())
    }

    fn expenses(&self) -> Result<Vec<Expense>, StoreError> {
        Ok(self.expenses.clone())
    }

    fn incomes(&self) -> Result<Vec<Income>, StoreError> {
        Ok(self.incomes.clone())
    }

    fn wishlist(&self) -> Result<Vec<WishlistItem>, StoreError> {
        Ok(self.wishlist.clone())
    }

    fn budgets(&self, month: MonthKey) -> Result<Vec<CategoryBudget>, StoreError> {
        Ok(self
            .budgets
            .iter()
            .filter(|b| b.month == month)
            .cloned()
            .collect())
    }

    fn upsert_budget(&mut self, budget: &CategoryBudget) -> Result<CategoryBudget, StoreError> {
        if Category::find_by_id(&self.categories, budget.category_id).is_none() {
            return Err(StoreError::NotFound("Category"));
        }

        if let Some(existing) = self.budgets.iter_mut().find(|b| b.same_slot(budget)) {
            existing.amount = budget.amount;
            return Ok(existing.clone());
        }

        let record = CategoryBudget {
            id: Some(next_id(self.budgets.iter().map(|b| b.id))),
            ..budget.clone()
        };
        self.budgets.push(record.clone());
        Ok(record)
    }

    fn savings(&self, month: MonthKey) -> Result<Option<Savings>, StoreError> {
        Ok(self.savings.iter().find(|s| s.month == month).cloned())
    }

    fn savings_history(&self) -> Result<Vec<Savings>, StoreError> {
        Ok(self.savings.clone())
    }

    fn upsert_savings(&mut self, savings: &Savings) -> Result<Savings, StoreError> {
        if let Some(existing) = self.savings.iter_mut().find(|s| s.month == savings.month) {
            existing.amount = savings.amount;
            return Ok(existing.clone());
        }

        let record = Savings {
            id: Some(next_id(self.savings.iter().map(|s| s.id))),
            ..savings.clone()
        };
        self.savings.push(record.clone());
        Ok(record)
    }

    fn create_expense(&mut self, expense: &NewExpense) -> Result<Expense, StoreError> {
        let category = self.category_named(&expense.category)?;

        let record = Expense {
            id: Some(next_id(self.expenses.iter().map(|e| e.id))),
            amount: expense.amount,
            category: category.name.clone(),
            category_id: category.id,
            date: expense.date,
            description: expense.description.clone(),
        };
        self.expenses.push(record.clone());
        Ok(record)
    }

    fn update_expense(&mut self, id: i64, patch: &ExpensePatch) -> Result<Expense, StoreError> {
        let category = match &patch.category {
            Some(name) => Some(self.category_named(name)?.clone()),
            None => None,
        };
        let expense = self
            .expenses
            .iter_mut()
            .find(|e| e.id == Some(id))
            .ok_or(StoreError::NotFound("Expense"))?;

        if let Some(amount) = patch.amount {
            expense.amount = amount;
        }
        if let Some(category) = category {
            expense.category = category.name;
            expense.category_id = category.id;
        }
        if let Some(date) = patch.date {
            expense.date = date;
        }
        if let Some(description) = &patch.description {
            expense.description = Some(description.clone());
        }
        Ok(expense.clone())
    }

    fn delete_expense(&mut self, id: i64) -> Result<(), StoreError> {
        remove_by_id(&mut self.expenses, id, |e| e.id, "Expense").map(|_| ())
    }

    fn create_income(&mut self, income: &NewIncome) -> Result<Income, StoreError> {
        let record = Income {
            id: Some(next_id(self.incomes.iter().map(|i| i.id))),
            is_recurring: income.is_recurring,
            frequency: income.frequency,
            notes: income.notes.clone(),
            ..Income::new(income.source.clone(), income.amount, income.date)
        };
        self.incomes.push(record.clone());
        Ok(record)
    }

    fn update_income(&mut self, id: i64, patch: &IncomePatch) -> Result<Income, StoreError> {
        let income = self
            .incomes
            .iter_mut()
            .find(|i| i.id == Some(id))
            .ok_or(StoreError::NotFound("Income record"))?;
        patch.apply(income);
        Ok(income.clone())
    }

    fn delete_income(&mut self, id: i64) -> Result<(), StoreError> {
        remove_by_id(&mut self.incomes, id, |i| i.id, "Income record").map(|_| ())
    }

    fn create_wishlist_item(
        &mut self,
        item: &NewWishlistItem,
    ) -> Result<WishlistItem, StoreError> {
        let record = WishlistItem {
            id: Some(next_id(self.wishlist.iter().map(|w| w.id))),
            url: item.url.clone(),
            notes: item.notes.clone(),
            ..WishlistItem::new(item.item_name.clone(), item.price)
        };
        self.wishlist.push(record.clone());
        Ok(record)
    }

    fn update_wishlist_item(
        &mut self,
        id: i64,
        patch: &WishlistPatch,
    ) -> Result<WishlistItem, StoreError> {
        let item = self
            .wishlist
            .iter_mut()
            .find(|w| w.id == Some(id))
            .ok_or(StoreError::NotFound("Wishlist item"))?;
        patch.apply(item);
        Ok(item.clone())
    }

    fn delete_wishlist_item(&mut self, id: i64) -> Result<(), StoreError> {
        remove_by_id(&mut self.wishlist, id, |w| w.id, "Wishlist item").map(|_| ())
    }

    fn purchase_wishlist_item(
        &mut self,
        id: i64,
        purchase: &Purchase,
    ) -> Result<Expense, StoreError> {
        let item = self
            .wishlist
            .iter()
            .find(|w| w.id == Some(id))
            .ok_or(StoreError::NotFound("Wishlist item"))?;

        let form = NewExpense {
            amount: item.price,
            category: purchase.category.clone(),
            date: purchase.date,
            description: Some(item.purchase_description()),
        };
        let expense = self.create_expense(&form)?;
        remove_by_id(&mut self.wishlist, id, |w| w.id, "Wishlist item")?;
        Ok(expense)
    }

    fn create_category(&mut self, category: &Category) -> Result<Category, StoreError> {
        if Category::find_by_name(&self.categories, &category.name).is_some() {
            return Err(StoreError::Duplicate("Category"));
        }

        let record = Category {
            id: Some(next_id(self.categories.iter().map(|c| c.id))),
            name: category.name.trim().to_string(),
            is_custom: true,
            ..category.clone()
        };
        self.categories.push(record.clone());
        Ok(record)
    }

    fn delete_category(&mut self, id: i64) -> Result<(), StoreError> {
        let pos = self
            .categories
            .iter()
            .position(|c| c.id == Some(id) && c.is_custom)
            .ok_or(StoreError::NotFound("Custom category"))?;
        self.categories.remove(pos);
        self.budgets.retain(|b| b.category_id != id);
        Ok(())
    }
}
