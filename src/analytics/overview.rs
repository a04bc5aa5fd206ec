use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use super::{MonthlyAmount, MonthlyCategorySpend};
use crate::models::{Expense, Income, MonthKey, Savings, WishlistItem};

/// Months shown on the trend charts, current month included.
pub const TREND_MONTHS: usize = 6;
const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub total: Decimal,
    /// Share of the month's spend, 0-100.
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOverview {
    pub month: MonthKey,
    pub total_expenses_month: Decimal,
    pub income_total_month: Decimal,
    pub net_balance_month: Decimal,
    pub expenses_mom_percentage: Option<Decimal>,
    pub income_mom_percentage: Option<Decimal>,
    pub expenses_by_category: Vec<CategorySummary>,
    pub monthly_category_spend: Vec<MonthlyCategorySpend>,
    pub monthly_income: Vec<MonthlyAmount>,
    pub monthly_savings: Vec<MonthlyAmount>,
    pub recent_transactions: Vec<Expense>,
    pub wishlist_total: Decimal,
    pub wishlist_count: usize,
}

impl DashboardOverview {
    pub fn compute(
        expenses: &[Expense],
        incomes: &[Income],
        savings: &[Savings],
        wishlist: &[WishlistItem],
        today: NaiveDate,
    ) -> Self {
        let month = MonthKey::of(today);
        let previous = month.shift(-1);
        let trend_start = month.shift(1 - TREND_MONTHS as i32);

        let month_expenses: Vec<&Expense> =
            expenses.iter().filter(|e| month.contains(e.date)).collect();
        let total_expenses_month = sum(month_expenses.iter().map(|e| e.amount));
        let total_expenses_previous = sum(
            expenses
                .iter()
                .filter(|e| previous.contains(e.date))
                .map(|e| e.amount),
        );

        let income_total_month = income_total(incomes, month.first_day(), today);
        let income_total_previous =
            income_total(incomes, previous.first_day(), previous.last_day());

        let in_trend = |m: MonthKey| m >= trend_start && m <= month;

        Self {
            month,
            total_expenses_month,
            income_total_month,
            net_balance_month: income_total_month.saturating_sub(total_expenses_month),
            expenses_mom_percentage: month_over_month(total_expenses_month, total_expenses_previous),
            income_mom_percentage: month_over_month(income_total_month, income_total_previous),
            expenses_by_category: category_breakdown(&month_expenses, total_expenses_month),
            monthly_category_spend: category_spend_by_month(
                expenses.iter().filter(|e| in_trend(e.month())),
            ),
            monthly_income: amounts_by_month(
                incomes
                    .iter()
                    .filter(|i| in_trend(MonthKey::of(i.date)))
                    .map(|i| (MonthKey::of(i.date), i.amount)),
            ),
            monthly_savings: amounts_by_month(
                savings
                    .iter()
                    .filter(|s| in_trend(s.month))
                    .filter_map(|s| s.amount.map(|a| (s.month, a))),
            ),
            recent_transactions: recent(expenses, RECENT_LIMIT),
            wishlist_total: sum(wishlist.iter().map(|w| w.price)),
            wishlist_count: wishlist.len(),
        }
    }
}

/// Incomes dated within `[start, cutoff]`, plus every recurring income
/// dated on or before `cutoff`.
pub fn income_total(incomes: &[Income], start: NaiveDate, cutoff: NaiveDate) -> Decimal {
    let counted = incomes
        .iter()
        .filter(|i| (i.date >= start || i.is_recurring) && i.date <= cutoff);
    sum(counted.map(|i| i.amount))
}

/// Saturating total, so absurd amounts cap at `Decimal::MAX` instead of
/// overflowing.
pub(crate) fn sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Percentage change from `previous`; `None` when there is nothing to compare to.
pub fn month_over_month(current: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    current
        .checked_sub(previous)?
        .checked_div(previous)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

pub fn share(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

fn category_breakdown(expenses: &[&Expense], month_total: Decimal) -> Vec<CategorySummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for e in expenses {
        let name = e.category.as_str();
        let total = totals.entry(name).or_insert_with(|| {
            order.push(name);
            Decimal::ZERO
        });
        *total = total.saturating_add(e.amount);
    }

    let mut summaries: Vec<CategorySummary> = order
        .into_iter()
        .map(|category| {
            let total = totals.get(category).copied().unwrap_or(Decimal::ZERO);
            CategorySummary {
                category: category.to_string(),
                total,
                percentage: share(total, month_total),
            }
        })
        .collect();
    summaries.sort_by(|a, b| b.total.cmp(&a.total));
    summaries
}

fn category_spend_by_month<'a>(
    expenses: impl Iterator<Item = &'a Expense>,
) -> Vec<MonthlyCategorySpend> {
    let mut totals: BTreeMap<(MonthKey, &str), Decimal> = BTreeMap::new();
    for e in expenses {
        let total = totals
            .entry((e.month(), e.category.as_str()))
            .or_insert(Decimal::ZERO);
        *total = total.saturating_add(e.amount);
    }
    totals
        .into_iter()
        .map(|((month, category), total)| MonthlyCategorySpend {
            month,
            category: category.to_string(),
            total,
        })
        .collect()
}

fn amounts_by_month(amounts: impl Iterator<Item = (MonthKey, Decimal)>) -> Vec<MonthlyAmount> {
    let mut totals: BTreeMap<MonthKey, Decimal> = BTreeMap::new();
    for (month, amount) in amounts {
        let total = totals.entry(month).or_insert(Decimal::ZERO);
        *total = total.saturating_add(amount);
    }
    totals
        .into_iter()
        .map(|(month, total)| MonthlyAmount { month, total })
        .collect()
}

/// The `limit` latest expenses, newest first.
fn recent(expenses: &[Expense], limit: usize) -> Vec<Expense> {
    let mut sorted: Vec<&Expense> = expenses.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.into_iter().take(limit).cloned().collect()
}
