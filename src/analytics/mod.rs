//! Dashboard figures and chart series derived from the raw collections.

mod overview;
mod stacked;

pub(crate) use overview::sum;
pub use overview::{DashboardOverview, TREND_MONTHS};
pub use stacked::{
    monthly_series, stack_category_spend, MonthlyAmount, MonthlyCategorySpend, StackedSpend,
};

#[cfg(test)]
mod tests;
