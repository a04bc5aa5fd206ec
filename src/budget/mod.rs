//! Per-category budget utilisation for one month.
//!
//! Joins three independently loaded collections (expenses, categories and
//! the month's budgets) into [`BudgetRow`]s. Everything here is a pure
//! function of its inputs and safe to recompute on every change.

mod board;
mod draft;

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{Category, CategoryBudget, Expense, MonthKey};

pub(crate) use board::{BudgetBoard, Notice, NoticeLevel};
pub(crate) use draft::{save_savings, BudgetDrafts};

/// Share of the limit above which a category is flagged as close to its budget.
const WARNING_PERCENTAGE: i64 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Spent,
    Budget,
    Remaining,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Spent => "spent",
            Self::Budget => "budget",
            Self::Remaining => "remaining",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Some(Self::Name),
            "spent" => Some(Self::Spent),
            "budget" => Some(Self::Budget),
            "remaining" => Some(Self::Remaining),
            _ => None,
        }
    }

    pub fn all() -> &'static [SortKey] {
        &[Self::Name, Self::Spent, Self::Budget, Self::Remaining]
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a row should be drawn on a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageLevel {
    Unset,
    Ok,
    Warning,
    Over,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetRow {
    pub category_id: i64,
    pub category: String,
    pub spent: Decimal,
    /// Positive limit for the month; `None` when no limit applies.
    pub budget: Option<Decimal>,
    /// `budget - spent`, only when a limit applies.
    pub remaining: Option<Decimal>,
    /// Utilisation capped at 100, for progress bars.
    pub percentage: Decimal,
    pub is_over_budget: bool,
}

impl BudgetRow {
    fn compute(category_id: i64, category: String, spent: Decimal, budget: Option<Decimal>) -> Self {
        let budget = budget.filter(|b| *b > Decimal::ZERO);
        let (remaining, percentage, is_over_budget) = match budget {
            Some(limit) => (Some(limit - spent), utilisation(spent, limit), spent > limit),
            None => (None, Decimal::ZERO, false),
        };
        Self {
            category_id,
            category,
            spent,
            budget,
            remaining,
            percentage,
            is_over_budget,
        }
    }

    pub fn usage(&self) -> UsageLevel {
        if self.budget.is_none() {
            UsageLevel::Unset
        } else if self.is_over_budget {
            UsageLevel::Over
        } else if self.percentage > Decimal::from(WARNING_PERCENTAGE) {
            UsageLevel::Warning
        } else {
            UsageLevel::Ok
        }
    }
}

fn utilisation(spent: Decimal, limit: Decimal) -> Decimal {
    spent
        .checked_div(limit)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ONE_HUNDRED)
        .min(Decimal::ONE_HUNDRED)
}

/// Build the budget view for `month`, one row per category except Savings.
pub fn aggregate(
    month: MonthKey,
    expenses: &[Expense],
    categories: &[Category],
    budgets: &[CategoryBudget],
    sort: SortKey,
) -> Vec<BudgetRow> {
    let spending = spending_by_category(month, expenses, categories);
    let limits = budget_limits(month, budgets);

    let mut rows: Vec<BudgetRow> = categories
        .iter()
        .filter(|c| !c.is_savings())
        .filter_map(|c| {
            let Some(id) = c.id else {
                tracing::warn!(category = %c.name, "category has no id; left out of budgets");
                return None;
            };
            let spent = spending.get(&id).copied().unwrap_or(Decimal::ZERO);
            let budget = limits.get(&id).copied().flatten();
            Some(BudgetRow::compute(id, c.name.clone(), spent, budget))
        })
        .collect();

    sort_rows(&mut rows, sort);
    rows
}

/// Sum of expense amounts in `month`, keyed by category id. Totals saturate
/// at `Decimal::MAX`.
///
/// An expense's own `category_id` wins; otherwise its recorded name is
/// resolved against `categories`. Unresolvable expenses are dropped.
pub fn spending_by_category(
    month: MonthKey,
    expenses: &[Expense],
    categories: &[Category],
) -> HashMap<i64, Decimal> {
    let by_name: HashMap<&str, i64> = categories
        .iter()
        .filter_map(|c| c.id.map(|id| (c.name.as_str(), id)))
        .collect();

    let mut totals: HashMap<i64, Decimal> = HashMap::new();
    for expense in expenses.iter().filter(|e| month.contains(e.date)) {
        let id = expense
            .category_id
            .or_else(|| by_name.get(expense.category.as_str()).copied());
        if let Some(id) = id {
            let total = totals.entry(id).or_insert(Decimal::ZERO);
            *total = total.saturating_add(expense.amount);
        }
    }
    totals
}

/// Budget amount per category id for `month`. Later records win.
pub fn budget_limits(month: MonthKey, budgets: &[CategoryBudget]) -> HashMap<i64, Option<Decimal>> {
    budgets
        .iter()
        .filter(|b| b.month == month)
        .map(|b| (b.category_id, b.amount))
        .collect()
}

/// Stable sort; rows without a limit go last for the budget and remaining keys.
pub fn sort_rows(rows: &mut [BudgetRow], key: SortKey) {
    match key {
        SortKey::Name => rows.sort_by(|a, b| {
            a.category
                .to_lowercase()
                .cmp(&b.category.to_lowercase())
                .then_with(|| a.category.cmp(&b.category))
        }),
        SortKey::Spent => rows.sort_by(|a, b| b.spent.cmp(&a.spent)),
        SortKey::Budget => rows.sort_by(|a, b| descending_unset_last(a.budget, b.budget)),
        SortKey::Remaining => rows.sort_by(|a, b| descending_unset_last(a.remaining, b.remaining)),
    }
}

fn descending_unset_last(a: Option<Decimal>, b: Option<Decimal>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => b.cmp(&a),
    }
}

/// Apply a committed budget to the local list, replacing the record for the
/// same `(category, month)` or appending it.
pub fn merge_committed(budgets: &mut Vec<CategoryBudget>, committed: CategoryBudget) {
    match budgets.iter_mut().find(|b| b.same_slot(&committed)) {
        Some(existing) => *existing = committed,
        None => budgets.push(committed),
    }
}
