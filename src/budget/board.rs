use rust_decimal::Decimal;

use super::{aggregate, merge_committed, BudgetDrafts, BudgetRow, SortKey};
use crate::error::BudgetError;
use crate::models::{Category, CategoryBudget, Expense, MonthKey};
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NoticeLevel {
    Success,
    Error,
}

/// One-shot message for the user, drained with [`BudgetBoard::take_notices`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Notice {
    pub(crate) level: NoticeLevel,
    pub(crate) message: String,
}

impl Notice {
    fn success(message: &str) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.to_string(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// State behind the budgets screen: the three fetched collections, the
/// selected month and sort, and the per-category drafts.
#[derive(Debug)]
pub(crate) struct BudgetBoard {
    month: MonthKey,
    sort: SortKey,
    expenses: Vec<Expense>,
    categories: Vec<Category>,
    budgets: Vec<CategoryBudget>,
    drafts: BudgetDrafts,
    notices: Vec<Notice>,
}

impl BudgetBoard {
    pub(crate) fn new(month: MonthKey) -> Self {
        Self {
            month,
            sort: SortKey::default(),
            expenses: Vec::new(),
            categories: Vec::new(),
            budgets: Vec::new(),
            drafts: BudgetDrafts::default(),
            notices: Vec::new(),
        }
    }

    pub(crate) fn month(&self) -> MonthKey {
        self.month
    }

    pub(crate) fn sort(&self) -> SortKey {
        self.sort
    }

    pub(crate) fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    pub(crate) fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub(crate) fn budgets(&self) -> &[CategoryBudget] {
        &self.budgets
    }

    /// Fetch all three collections. Each fetch stands alone: a failure keeps
    /// that collection's previous contents and queues an error notice.
    pub(crate) fn refresh<S: Store>(&mut self, store: &S) {
        match store.expenses() {
            Ok(expenses) => self.expenses = expenses,
            Err(e) => self.fetch_failed("expenses", &e),
        }
        match store.categories() {
            Ok(categories) => self.categories = categories,
            Err(e) => self.fetch_failed("categories", &e),
        }
        self.reload_budgets(store);
    }

    pub(crate) fn set_month<S: Store>(&mut self, store: &S, month: MonthKey) {
        self.month = month;
        self.reload_budgets(store);
    }

    fn reload_budgets<S: Store>(&mut self, store: &S) {
        match store.budgets(self.month) {
            Ok(budgets) => {
                tracing::debug!(month = %self.month, count = budgets.len(), "loaded budgets");
                self.drafts.load(self.month, &budgets, &self.categories);
                self.budgets = budgets;
            }
            Err(e) => self.fetch_failed("budgets", &e),
        }
    }

    fn fetch_failed(&mut self, what: &str, error: &dyn std::error::Error) {
        tracing::warn!(error = %error, "failed to load {what}");
        self.notices
            .push(Notice::error(format!("Failed to load {what}.")));
    }

    pub(crate) fn rows(&self) -> Vec<BudgetRow> {
        aggregate(
            self.month,
            &self.expenses,
            &self.categories,
            &self.budgets,
            self.sort,
        )
    }

    pub(crate) fn draft(&self, category_id: i64) -> &str {
        self.drafts.draft(category_id)
    }

    pub(crate) fn edit_draft(&mut self, category_id: i64, text: impl Into<String>) {
        self.drafts.edit(category_id, text);
    }

    pub(crate) fn is_dirty(&self, category_id: i64) -> bool {
        self.drafts.is_dirty(category_id)
    }

    /// Commit the draft for `category_id` in the selected month.
    ///
    /// Returns `Ok(None)` when the draft has no unsaved change. Validation
    /// and write failures leave the local budget list untouched.
    pub(crate) fn save_budget<S: Store>(
        &mut self,
        store: &mut S,
        category_id: i64,
    ) -> Result<Option<CategoryBudget>, BudgetError> {
        if !self.drafts.is_dirty(category_id) {
            return Ok(None);
        }

        let amount: Option<Decimal> = match self.drafts.pending(category_id) {
            Ok(amount) => amount,
            Err(e) => {
                self.notices.push(Notice::error(e.to_string()));
                return Err(e);
            }
        };

        let request = CategoryBudget::new(category_id, self.month, amount);
        match store.upsert_budget(&request) {
            Ok(record) => {
                tracing::info!(
                    category_id,
                    month = %self.month,
                    amount = ?record.amount,
                    "budget saved"
                );
                self.drafts.commit(&record);
                merge_committed(&mut self.budgets, record.clone());
                self.notices.push(Notice::success("Budget saved."));
                Ok(Some(record))
            }
            Err(source) => {
                tracing::warn!(category_id, month = %self.month, error = %source, "budget update failed");
                self.notices.push(Notice::error("Failed to update budget."));
                Err(BudgetError::Write {
                    what: "budget",
                    source,
                })
            }
        }
    }

    pub(crate) fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod tests;
