use rust_decimal::Decimal;

use super::MonthKey;

/// Spending limit for one category in one month.
///
/// `amount` of `None` is an explicit "no limit set", stored as such and
/// distinct from a zero amount.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBudget {
    pub id: Option<i64>,
    pub category_id: i64,
    pub month: MonthKey,
    pub amount: Option<Decimal>,
}

impl CategoryBudget {
    pub fn new(category_id: i64, month: MonthKey, amount: Option<Decimal>) -> Self {
        Self {
            id: None,
            category_id,
            month,
            amount,
        }
    }

    /// Whether both records address the same `(category, month)` slot.
    pub fn same_slot(&self, other: &CategoryBudget) -> bool {
        self.category_id == other.category_id && self.month == other.month
    }
}
