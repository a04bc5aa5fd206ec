//! Field parsers shared by the entry forms.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::BudgetError;

/// A strictly positive money amount.
pub fn parse_amount(text: &str) -> Result<Decimal, BudgetError> {
    let text = text.trim();
    let amount = Decimal::from_str(text)
        .map_err(|_| BudgetError::Validation(format!("Invalid amount: {text}")))?;
    if amount <= Decimal::ZERO {
        return Err(BudgetError::Validation(
            "Amount must be greater than zero.".into(),
        ));
    }
    Ok(amount)
}

/// An ISO `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Result<NaiveDate, BudgetError> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| BudgetError::Validation(format!("Invalid date: {text}")))
}

/// Trimmed text, or `None` when blank.
pub fn optional_text(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Trimmed text that must not be blank.
pub fn required_text(text: &str, field: &str) -> Result<String, BudgetError> {
    optional_text(text).ok_or_else(|| BudgetError::Validation(format!("{field} cannot be empty.")))
}
