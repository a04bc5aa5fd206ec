use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::MonthKey;

/// Spend for one category in one month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyCategorySpend {
    pub month: MonthKey,
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAmount {
    pub month: MonthKey,
    pub total: Decimal,
}

/// One bar of the stacked chart: a month and its per-category totals.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedMonth {
    pub month: MonthKey,
    pub totals: BTreeMap<String, Decimal>,
}

impl StackedMonth {
    /// Total for `category`; zero when the month has no entry for it.
    pub fn value(&self, category: &str) -> Decimal {
        self.totals.get(category).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn total(&self) -> Decimal {
        super::overview::sum(self.totals.values().copied())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackedSpend {
    /// Every category seen in the input, sorted.
    pub categories: Vec<String>,
    /// Chronological.
    pub months: Vec<StackedMonth>,
}

/// Pivot `(month, category, total)` rows into one entry per month.
///
/// A repeated `(month, category)` keeps the last total seen.
pub fn stack_category_spend(entries: &[MonthlyCategorySpend]) -> StackedSpend {
    let categories: BTreeSet<&str> = entries.iter().map(|e| e.category.as_str()).collect();

    let mut by_month: BTreeMap<MonthKey, BTreeMap<String, Decimal>> = BTreeMap::new();
    for entry in entries {
        by_month
            .entry(entry.month)
            .or_default()
            .insert(entry.category.clone(), entry.total);
    }

    StackedSpend {
        categories: categories.into_iter().map(String::from).collect(),
        months: by_month
            .into_iter()
            .map(|(month, totals)| StackedMonth { month, totals })
            .collect(),
    }
}

/// Lay `entries` over the `count` months ending at `end`, filling gaps with
/// zero. Entries outside the window are ignored; repeated months add up.
pub fn monthly_series(entries: &[MonthlyAmount], end: MonthKey, count: usize) -> Vec<MonthlyAmount> {
    let mut totals: BTreeMap<MonthKey, Decimal> = end
        .window(count)
        .into_iter()
        .map(|month| (month, Decimal::ZERO))
        .collect();

    for entry in entries {
        if let Some(total) = totals.get_mut(&entry.month) {
            *total = total.saturating_add(entry.total);
        }
    }

    totals
        .into_iter()
        .map(|(month, total)| MonthlyAmount { month, total })
        .collect()
}
