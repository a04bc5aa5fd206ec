use regex::Regex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::BudgetError;
use crate::models::{Category, CategoryBudget, MonthKey, Savings};
use crate::store::Store;

const INVALID_BUDGET: &str = "Enter a valid non-negative budget.";
const INVALID_SAVINGS: &str = "Enter a valid non-negative savings amount.";

fn number_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^-?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][-+]?[0-9]+)?$").ok())
        .as_ref()
}

/// Decimal value of text already matched by [`number_pattern`]. A bare
/// leading or trailing point ("5.", ".5") is padded before parsing.
fn to_decimal(text: &str) -> Option<Decimal> {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(at) => (&text[..at], Some(&text[at + 1..])),
        None => (text, None),
    };
    let (sign, digits) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits = digits.strip_suffix('.').unwrap_or(digits);
    let padded = if digits.starts_with('.') {
        format!("{sign}0{digits}")
    } else {
        format!("{sign}{digits}")
    };

    match exponent {
        Some(exp) => Decimal::from_scientific(&format!("{padded}e{exp}")).ok(),
        None => Decimal::from_str(&padded).ok(),
    }
}

/// Parse typed amount text. Blank is `None` (clear); anything that is not
/// a non-negative number is rejected with `message`.
fn parse_amount(text: &str, message: &str) -> Result<Option<Decimal>, BudgetError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let well_formed = number_pattern().is_some_and(|re| re.is_match(unsigned));
    let value = if well_formed { to_decimal(unsigned) } else { None };

    match value {
        Some(v) if v.is_zero() || v.is_sign_positive() => Ok(Some(v)),
        _ => Err(BudgetError::Validation(message.into())),
    }
}

/// Budget draft text to the amount to commit. Zero means "no limit".
pub(crate) fn parse_budget_draft(text: &str) -> Result<Option<Decimal>, BudgetError> {
    Ok(parse_amount(text, INVALID_BUDGET)?.filter(|v| !v.is_zero()))
}

/// Savings draft text to the amount to commit. Zero is kept as zero.
pub(crate) fn parse_savings_draft(text: &str) -> Result<Option<Decimal>, BudgetError> {
    parse_amount(text, INVALID_SAVINGS)
}

/// The text an input shows for a committed amount.
pub(crate) fn draft_text(amount: Option<Decimal>) -> String {
    amount.map(|a| a.normalize().to_string()).unwrap_or_default()
}

/// Unsaved budget inputs, tracked separately from the committed amounts so
/// edits never leak into the aggregation until they are saved.
#[derive(Debug, Clone, Default)]
pub(crate) struct BudgetDrafts {
    month: Option<MonthKey>,
    drafts: HashMap<i64, String>,
    committed: HashMap<i64, Option<Decimal>>,
}

impl BudgetDrafts {
    /// Reset the baseline to a freshly fetched month of budgets.
    ///
    /// Categories with a record get its value as their draft. Other known
    /// categories keep an unsaved edit only when `month` is the month already
    /// loaded; after a month switch they start blank.
    pub(crate) fn load(
        &mut self,
        month: MonthKey,
        budgets: &[CategoryBudget],
        categories: &[Category],
    ) {
        if self.month != Some(month) {
            self.drafts.clear();
            self.month = Some(month);
        }
        self.committed.clear();
        for budget in budgets {
            self.committed.insert(budget.category_id, budget.amount);
            self.drafts
                .insert(budget.category_id, draft_text(budget.amount));
        }
        for id in categories.iter().filter_map(|c| c.id) {
            self.drafts.entry(id).or_default();
        }
    }

    pub(crate) fn draft(&self, category_id: i64) -> &str {
        self.drafts.get(&category_id).map(String::as_str).unwrap_or("")
    }

    pub(crate) fn edit(&mut self, category_id: i64, text: impl Into<String>) {
        self.drafts.insert(category_id, text.into());
    }

    pub(crate) fn committed(&self, category_id: i64) -> Option<Decimal> {
        self.committed.get(&category_id).copied().flatten()
    }

    /// Whether the draft differs from the committed value's text.
    pub(crate) fn is_dirty(&self, category_id: i64) -> bool {
        self.draft(category_id) != draft_text(self.committed(category_id))
    }

    pub(crate) fn pending(&self, category_id: i64) -> Result<Option<Decimal>, BudgetError> {
        parse_budget_draft(self.draft(category_id))
    }

    /// Adopt a commit response as the new baseline and resync the draft.
    pub(crate) fn commit(&mut self, record: &CategoryBudget) {
        self.committed.insert(record.category_id, record.amount);
        self.drafts
            .insert(record.category_id, draft_text(record.amount));
    }
}

/// Validate a savings draft and upsert it for `month`.
pub(crate) fn save_savings<S: Store>(
    store: &mut S,
    month: MonthKey,
    text: &str,
) -> Result<Savings, BudgetError> {
    let amount = parse_savings_draft(text)?;
    match store.upsert_savings(&Savings::new(month, amount)) {
        Ok(saved) => {
            tracing::info!(month = %month, amount = ?saved.amount, "savings saved");
            Ok(saved)
        }
        Err(source) => {
            tracing::warn!(month = %month, error = %source, "savings update failed");
            Err(BudgetError::Write {
                what: "savings",
                source,
            })
        }
    }
}

#[cfg(test)]
#[path = "draft_tests.rs"]
mod tests;
