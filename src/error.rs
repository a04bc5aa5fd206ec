use thiserror::Error;

use crate::store::StoreError;

/// Failures surfaced to the user by the budget workflows.
///
/// None of these are fatal: validation errors are raised before any request
/// is made, and fetch/write errors leave local state as it was.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Failed to load {what}: {source}")]
    Fetch {
        what: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Failed to save {what}: {source}")]
    Write {
        what: &'static str,
        #[source]
        source: StoreError,
    },
}

impl BudgetError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidMonth(_))
    }

    /// Adapter for `map_err` on a failed read of `what`.
    pub fn fetch(what: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Fetch { what, source }
    }

    /// Adapter for `map_err` on a failed write of `what`.
    pub fn write(what: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Write { what, source }
    }
}
