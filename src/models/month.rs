use chrono::{Datelike, NaiveDate};
use std::str::FromStr;

use crate::error::BudgetError;

/// A calendar month, stored as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn current() -> Self {
        Self::of(chrono::Local::now().date_naive())
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        self.shift(1).0.pred_opt().unwrap_or(self.0)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::of(date) == *self
    }

    /// Move forward (or backward, for negative `delta`) by whole months.
    pub fn shift(&self, delta: i32) -> Self {
        let index = self.0.month0() as i32 + delta;
        let year = self.0.year() + index.div_euclid(12);
        let month = index.rem_euclid(12) as u32 + 1;
        Self::new(year, month).unwrap_or(*self)
    }

    /// `count` consecutive months ending with (and including) `self`.
    pub fn window(&self, count: usize) -> Vec<MonthKey> {
        (0..count).rev().map(|back| self.shift(-(back as i32))).collect()
    }

    /// Query parameter form: the month's first day, `YYYY-MM-01`.
    pub fn as_param(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// e.g. "March 2024"
    pub fn label(&self) -> String {
        self.0.format("%B %Y").to_string()
    }

    /// e.g. "Mar 24"
    pub fn short_label(&self) -> String {
        self.0.format("%b %y").to_string()
    }
}

impl FromStr for MonthKey {
    type Err = BudgetError;

    /// Accepts `YYYY-MM` or any `YYYY-MM-DD`, normalised to the first day.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let full = if trimmed.len() == 7 {
            format!("{trimmed}-01")
        } else {
            trimmed.to_string()
        };
        NaiveDate::parse_from_str(&full, "%Y-%m-%d")
            .map(Self::of)
            .map_err(|_| BudgetError::InvalidMonth(s.to_string()))
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}
