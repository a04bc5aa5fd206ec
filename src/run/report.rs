//! Plain-text renderings of the budget views, one `String` per output line.

use crate::analytics::{monthly_series, DashboardOverview, StackedSpend, TREND_MONTHS};
use crate::budget::{BudgetRow, SortKey, UsageLevel};
use crate::format::{
    format_currency, format_mom, format_optional_currency, format_percentage, progress_bar,
    truncate,
};
use crate::models::{Category, Expense, Income, MonthKey, Savings, WishlistItem};

const NAME_WIDTH: usize = 16;
const BAR_WIDTH: usize = 20;
const RULE: usize = 72;

fn rule() -> String {
    "─".repeat(RULE)
}

fn usage_marker(level: UsageLevel) -> &'static str {
    match level {
        UsageLevel::Over => "OVER",
        UsageLevel::Warning => "near",
        UsageLevel::Ok | UsageLevel::Unset => "",
    }
}

pub(crate) fn budget_lines(month: MonthKey, sort: SortKey, rows: &[BudgetRow]) -> Vec<String> {
    let mut lines = vec![
        format!("Budgets — {} (sorted by {sort})", month.label()),
        rule(),
    ];

    if rows.is_empty() {
        lines.push("No categories".to_string());
        return lines;
    }

    lines.push(format!(
        "{:<4} {:<NAME_WIDTH$} {:>12} {:>12} {:>12}  {}",
        "ID", "Category", "Spent", "Budget", "Remaining", "Used"
    ));
    for row in rows {
        let used = match row.budget {
            Some(_) => format!(
                "{} {:>4} {}",
                progress_bar(row.percentage, BAR_WIDTH),
                format_percentage(row.percentage),
                usage_marker(row.usage())
            ),
            None => "no limit".to_string(),
        };
        lines.push(
            format!(
                "{:<4} {:<NAME_WIDTH$} {:>12} {:>12} {:>12}  {}",
                row.category_id,
                truncate(&row.category, NAME_WIDTH),
                format_currency(row.spent),
                format_optional_currency(row.budget),
                format_optional_currency(row.remaining),
                used
            )
            .trim_end()
            .to_string(),
        );
    }

    let over = rows.iter().filter(|r| r.is_over_budget).count();
    if over > 0 {
        lines.push(String::new());
        lines.push(format!("{over} categor{} over budget", if over == 1 { "y" } else { "ies" }));
    }
    lines
}

pub(crate) fn stacked_lines(stacked: &StackedSpend) -> Vec<String> {
    let mut lines = vec!["Spending by category".to_string(), rule()];
    if stacked.months.is_empty() {
        lines.push("No spending in the last six months".to_string());
        return lines;
    }

    let mut header = format!("{:<NAME_WIDTH$}", "Category");
    for month in &stacked.months {
        header.push_str(&format!(" {:>11}", month.month.short_label()));
    }
    lines.push(header);

    for category in &stacked.categories {
        let mut line = format!("{:<NAME_WIDTH$}", truncate(category, NAME_WIDTH));
        for month in &stacked.months {
            line.push_str(&format!(" {:>11}", format_currency(month.value(category))));
        }
        lines.push(line);
    }

    let mut total = format!("{:<NAME_WIDTH$}", "Total");
    for month in &stacked.months {
        total.push_str(&format!(" {:>11}", format_currency(month.total())));
    }
    lines.push(total);
    lines
}

pub(crate) fn overview_lines(overview: &DashboardOverview, savings: Option<&Savings>) -> Vec<String> {
    let mut lines = vec![
        format!("Summary — {}", overview.month.label()),
        rule(),
        format!(
            "  Expenses:   {:>14}  {}",
            format_currency(overview.total_expenses_month),
            format_mom(overview.expenses_mom_percentage)
        ),
        format!(
            "  Income:     {:>14}  {}",
            format_currency(overview.income_total_month),
            format_mom(overview.income_mom_percentage)
        ),
        format!("  Net:        {:>14}", format_currency(overview.net_balance_month)),
        format!(
            "  Savings:    {:>14}",
            format_optional_currency(savings.and_then(|s| s.amount))
        ),
        format!(
            "  Wishlist:   {:>14}  ({} items)",
            format_currency(overview.wishlist_total),
            overview.wishlist_count
        ),
    ];

    if !overview.expenses_by_category.is_empty() {
        lines.push(String::new());
        lines.push("Spending by Category:".to_string());
        for c in &overview.expenses_by_category {
            lines.push(format!(
                "  {:<NAME_WIDTH$} {:>12} {:>5}",
                truncate(&c.category, NAME_WIDTH),
                format_currency(c.total),
                format_percentage(c.percentage)
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!("{:<10} {:>12} {:>12}", "Month", "Income", "Savings"));
    let income = monthly_series(&overview.monthly_income, overview.month, TREND_MONTHS);
    let saved = monthly_series(&overview.monthly_savings, overview.month, TREND_MONTHS);
    for (i, s) in income.iter().zip(&saved) {
        lines.push(format!(
            "{:<10} {:>12} {:>12}",
            i.month.short_label(),
            format_currency(i.total),
            format_currency(s.total)
        ));
    }

    if !overview.recent_transactions.is_empty() {
        lines.push(String::new());
        lines.push("Recent:".to_string());
        for e in &overview.recent_transactions {
            lines.push(
                format!(
                    "  {}  {:<NAME_WIDTH$} {:>12}  {}",
                    e.date.format("%Y-%m-%d"),
                    truncate(&e.category, NAME_WIDTH),
                    format_currency(e.amount),
                    truncate(e.description.as_deref().unwrap_or(""), 30)
                )
                .trim_end()
                .to_string(),
            );
        }
    }
    lines
}

pub(crate) fn category_lines(categories: &[Category]) -> Vec<String> {
    if categories.is_empty() {
        return vec!["No categories".to_string()];
    }
    let mut lines = vec![format!("{:<4} {:<20} Kind", "ID", "Name"), "─".repeat(34)];
    for c in categories {
        let kind = if c.is_savings() {
            "savings"
        } else if c.is_custom {
            "custom"
        } else {
            "default"
        };
        lines.push(format!(
            "{:<4} {:<20} {kind}",
            id_cell(c.id),
            truncate(&c.name, 20)
        ));
    }
    lines
}

fn id_cell(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

pub(crate) fn expense_lines(month: MonthKey, expenses: &[Expense]) -> Vec<String> {
    let mut lines = vec![format!("Expenses — {}", month.label()), rule()];
    let mut listed: Vec<&Expense> = expenses.iter().filter(|e| month.contains(e.date)).collect();
    if listed.is_empty() {
        lines.push("No expenses".to_string());
        return lines;
    }
    listed.sort_by_key(|e| e.date);

    for e in &listed {
        lines.push(
            format!(
                "{:<5} {}  {:<NAME_WIDTH$} {:>12}  {}",
                id_cell(e.id),
                e.date.format("%Y-%m-%d"),
                truncate(&e.category, NAME_WIDTH),
                format_currency(e.amount),
                truncate(e.description.as_deref().unwrap_or(""), 30)
            )
            .trim_end()
            .to_string(),
        );
    }
    let total = crate::analytics::sum(listed.iter().map(|e| e.amount));
    lines.push(format!("{} expenses, {}", listed.len(), format_currency(total)));
    lines
}

pub(crate) fn income_lines(incomes: &[Income]) -> Vec<String> {
    let mut lines = vec!["Income".to_string(), rule()];
    if incomes.is_empty() {
        lines.push("No income recorded".to_string());
        return lines;
    }

    let mut listed: Vec<&Income> = incomes.iter().collect();
    listed.sort_by(|a, b| b.date.cmp(&a.date));
    for i in listed {
        let repeats = match (i.is_recurring, i.frequency) {
            (true, Some(f)) => f.to_string(),
            (true, None) => "recurring".to_string(),
            (false, _) => String::new(),
        };
        lines.push(
            format!(
                "{:<5} {}  {:<20} {:>12}  {repeats}",
                id_cell(i.id),
                i.date.format("%Y-%m-%d"),
                truncate(&i.source, 20),
                format_currency(i.amount)
            )
            .trim_end()
            .to_string(),
        );
    }
    lines
}

pub(crate) fn wishlist_lines(items: &[WishlistItem]) -> Vec<String> {
    let mut lines = vec!["Wishlist".to_string(), rule()];
    if items.is_empty() {
        lines.push("Nothing on the wishlist".to_string());
        return lines;
    }

    for w in items {
        lines.push(
            format!(
                "{:<5} {:<24} {:>12}  {}",
                id_cell(w.id),
                truncate(&w.item_name, 24),
                format_currency(w.price),
                w.url.as_deref().unwrap_or("")
            )
            .trim_end()
            .to_string(),
        );
    }
    let total = crate::analytics::sum(items.iter().map(|w| w.price));
    lines.push(format!("{} items, {}", items.len(), format_currency(total)));
    lines
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
