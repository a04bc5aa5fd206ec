use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::form::{optional_text, parse_amount, parse_date};
use crate::error::BudgetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Some(Self::Weekly),
            "biweekly" | "bi-weekly" => Some(Self::Biweekly),
            "monthly" => Some(Self::Monthly),
            "yearly" | "annual" | "annually" => Some(Self::Yearly),
            _ => None,
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Income {
    pub id: Option<i64>,
    pub source: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub is_recurring: bool,
    pub frequency: Option<Frequency>,
    pub notes: Option<String>,
}

impl Income {
    pub fn new(source: String, amount: Decimal, date: NaiveDate) -> Self {
        Self {
            id: None,
            source,
            amount,
            date,
            is_recurring: false,
            frequency: None,
            notes: None,
        }
    }

    pub fn recurring(mut self, frequency: Frequency) -> Self {
        self.is_recurring = true;
        self.frequency = Some(frequency);
        self
    }
}

/// A validated income form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub source: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub is_recurring: bool,
    pub frequency: Option<Frequency>,
    pub notes: Option<String>,
}

impl NewIncome {
    pub fn parse(source: &str, amount: &str, date: &str, notes: &str) -> Result<Self, BudgetError> {
        let (source, amount, date) = (source.trim(), amount.trim(), date.trim());
        if source.is_empty() || amount.is_empty() || date.is_empty() {
            return Err(BudgetError::Validation(
                "Please complete source, amount, and date.".into(),
            ));
        }

        Ok(Self {
            source: source.to_string(),
            amount: parse_amount(amount)?,
            date: parse_date(date)?,
            is_recurring: false,
            frequency: None,
            notes: optional_text(notes),
        })
    }

    pub fn recurring(mut self, frequency: Frequency) -> Self {
        self.is_recurring = true;
        self.frequency = Some(frequency);
        self
    }
}

/// Fields to change on a stored income record. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomePatch {
    pub source: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub is_recurring: Option<bool>,
    pub frequency: Option<Frequency>,
    pub notes: Option<String>,
}

impl IncomePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(&self, income: &mut Income) {
        if let Some(source) = &self.source {
            income.source = source.clone();
        }
        if let Some(amount) = self.amount {
            income.amount = amount;
        }
        if let Some(date) = self.date {
            income.date = date;
        }
        if let Some(is_recurring) = self.is_recurring {
            income.is_recurring = is_recurring;
        }
        if let Some(frequency) = self.frequency {
            income.frequency = Some(frequency);
        }
        if let Some(notes) = &self.notes {
            income.notes = Some(notes.clone());
        }
    }
}
