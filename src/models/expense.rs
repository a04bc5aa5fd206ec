use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::form::{optional_text, parse_amount, parse_date};
use super::MonthKey;
use crate::error::BudgetError;

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: Option<i64>,
    pub amount: Decimal,
    /// Category name as recorded on the expense.
    pub category: String,
    /// Stable category link. When absent the name is resolved instead.
    pub category_id: Option<i64>,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl Expense {
    pub fn new(amount: Decimal, category: String, date: NaiveDate) -> Self {
        Self {
            id: None,
            amount,
            category,
            category_id: None,
            date,
            description: None,
        }
    }

    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.date)
    }
}

/// A validated expense form, ready to be sent to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl NewExpense {
    pub fn parse(
        amount: &str,
        category: &str,
        date: &str,
        description: &str,
    ) -> Result<Self, BudgetError> {
        let (amount, category, date) = (amount.trim(), category.trim(), date.trim());
        if amount.is_empty() || category.is_empty() || date.is_empty() {
            return Err(BudgetError::Validation(
                "Please complete amount, category, and date.".into(),
            ));
        }

        Ok(Self {
            amount: parse_amount(amount)?,
            category: category.to_string(),
            date: parse_date(date)?,
            description: optional_text(description),
        })
    }
}

/// Fields to change on a stored expense. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
