#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::overview::{income_total, month_over_month, share};
use super::*;
use crate::models::{Expense, Frequency, Income, MonthKey, Savings, WishlistItem};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn month(s: &str) -> MonthKey {
    s.parse().unwrap()
}

fn spend(m: &str, category: &str, total: Decimal) -> MonthlyCategorySpend {
    MonthlyCategorySpend {
        month: month(m),
        category: category.to_string(),
        total,
    }
}

fn expense(amount: Decimal, category: &str, day: &str) -> Expense {
    Expense::new(amount, category.to_string(), date(day))
}

// ── stack_category_spend ──────────────────────────────────────

#[test]
fn test_stack_sorts_legend_and_months() {
    let stacked = stack_category_spend(&[
        spend("2024-03", "Travel", dec!(300)),
        spend("2024-01", "Food", dec!(80)),
        spend("2024-03", "Car", dec!(40)),
        spend("2024-01", "Travel", dec!(20)),
    ]);

    assert_eq!(stacked.categories, vec!["Car", "Food", "Travel"]);
    let months: Vec<MonthKey> = stacked.months.iter().map(|m| m.month).collect();
    assert_eq!(months, vec![month("2024-01"), month("2024-03")]);
}

#[test]
fn test_stack_missing_pairs_read_zero() {
    let stacked = stack_category_spend(&[
        spend("2024-01", "Food", dec!(80)),
        spend("2024-02", "Car", dec!(40)),
    ]);
    assert_eq!(stacked.months[0].value("Car"), dec!(0));
    assert_eq!(stacked.months[0].value("Food"), dec!(80));
    assert_eq!(stacked.months[1].value("Food"), dec!(0));
    assert_eq!(stacked.months[1].total(), dec!(40));
}

#[test]
fn test_stack_repeated_pair_keeps_last() {
    let stacked = stack_category_spend(&[
        spend("2024-01", "Food", dec!(80)),
        spend("2024-01", "Food", dec!(95)),
    ]);
    assert_eq!(stacked.months.len(), 1);
    assert_eq!(stacked.months[0].value("Food"), dec!(95));
}

#[test]
fn test_stack_empty_input() {
    let stacked = stack_category_spend(&[]);
    assert!(stacked.categories.is_empty());
    assert!(stacked.months.is_empty());
}

// ── monthly_series ────────────────────────────────────────────

#[test]
fn test_monthly_series_fills_gaps() {
    let entries = vec![
        MonthlyAmount {
            month: month("2024-02"),
            total: dec!(3000),
        },
        MonthlyAmount {
            month: month("2023-01"),
            total: dec!(1),
        },
    ];
    let series = monthly_series(&entries, month("2024-03"), 6);

    assert_eq!(series.len(), 6);
    assert_eq!(series[0].month, month("2023-10"));
    assert_eq!(series[5].month, month("2024-03"));
    assert_eq!(series[4].total, dec!(3000));
    let rest: Decimal = series.iter().map(|s| s.total).sum();
    assert_eq!(rest, dec!(3000));
}

// ── helpers ───────────────────────────────────────────────────

#[test]
fn test_month_over_month() {
    assert_eq!(month_over_month(dec!(120), dec!(100)), Some(dec!(20)));
    assert_eq!(month_over_month(dec!(50), dec!(100)), Some(dec!(-50)));
    assert_eq!(month_over_month(dec!(50), dec!(0)), None);
}

#[test]
fn test_share_of_zero_total() {
    assert_eq!(share(dec!(0), dec!(0)), dec!(0));
    assert_eq!(share(dec!(25), dec!(100)), dec!(25));
}

#[test]
fn test_sum_saturates() {
    assert_eq!(sum([dec!(1.5), dec!(2.5)]), dec!(4));
    assert_eq!(sum([Decimal::MAX, dec!(1)]), Decimal::MAX);
    assert_eq!(sum(std::iter::empty()), dec!(0));
}

#[test]
fn test_overview_with_huge_amounts_does_not_overflow() {
    let expenses = vec![
        expense(Decimal::MAX, "Food", "2024-03-05"),
        expense(Decimal::MAX, "Food", "2024-03-06"),
        expense(Decimal::MAX, "Car", "2024-03-07"),
    ];
    let wishlist = vec![
        WishlistItem::new("Yacht".into(), Decimal::MAX),
        WishlistItem::new("Island".into(), Decimal::MAX),
    ];
    let o = DashboardOverview::compute(&expenses, &[], &[], &wishlist, date("2024-03-15"));

    assert_eq!(o.total_expenses_month, Decimal::MAX);
    assert_eq!(o.net_balance_month, -Decimal::MAX);
    assert_eq!(o.wishlist_total, Decimal::MAX);
    assert_eq!(o.expenses_by_category[0].total, Decimal::MAX);

    let stacked = stack_category_spend(&o.monthly_category_spend);
    assert_eq!(stacked.months[0].total(), Decimal::MAX);
}

#[test]
fn test_income_total_includes_recurring() {
    let incomes = vec![
        Income::new("Salary".into(), dec!(3000), date("2024-01-01")).recurring(Frequency::Monthly),
        Income::new("Bonus".into(), dec!(500), date("2024-03-10")),
        Income::new("Gift".into(), dec!(100), date("2024-03-20")),
        Income::new("Old".into(), dec!(70), date("2024-02-10")),
    ];
    let total = income_total(&incomes, date("2024-03-01"), date("2024-03-15"));
    assert_eq!(total, dec!(3500));
}

// ── DashboardOverview ─────────────────────────────────────────

fn overview() -> DashboardOverview {
    let expenses = vec![
        expense(dec!(50), "Food", "2024-03-05"),
        expense(dec!(30), "Food", "2024-03-10"),
        expense(dec!(20), "Car", "2024-03-12"),
        expense(dec!(100), "Food", "2024-02-10"),
        expense(dec!(5), "Car", "2023-09-01"),
        expense(dec!(7), "Gym", "2024-04-02"),
    ];
    let incomes = vec![
        Income::new("Salary".into(), dec!(3000), date("2024-01-01")).recurring(Frequency::Monthly),
        Income::new("Bonus".into(), dec!(500), date("2024-03-10")),
        Income::new("Gift".into(), dec!(100), date("2024-03-20")),
    ];
    let savings = vec![
        Savings::new(month("2024-02"), Some(dec!(200))),
        Savings::new(month("2024-03"), None),
    ];
    let wishlist = vec![
        WishlistItem::new("Headphones".into(), dec!(199.99)),
        WishlistItem::new("Book".into(), dec!(50)),
    ];
    DashboardOverview::compute(&expenses, &incomes, &savings, &wishlist, date("2024-03-15"))
}

#[test]
fn test_overview_totals() {
    let o = overview();
    assert_eq!(o.month, month("2024-03"));
    assert_eq!(o.total_expenses_month, dec!(100));
    assert_eq!(o.income_total_month, dec!(3500));
    assert_eq!(o.net_balance_month, dec!(3400));
    assert_eq!(o.expenses_mom_percentage, Some(dec!(0)));
    assert_eq!(
        o.income_mom_percentage.map(|p| p.round_dp(2)),
        Some(dec!(16.67))
    );
    assert_eq!(o.wishlist_total, dec!(249.99));
    assert_eq!(o.wishlist_count, 2);
}

#[test]
fn test_overview_category_breakdown() {
    let o = overview();
    let got: Vec<(&str, Decimal, Decimal)> = o
        .expenses_by_category
        .iter()
        .map(|c| (c.category.as_str(), c.total, c.percentage))
        .collect();
    assert_eq!(got, vec![("Food", dec!(80), dec!(80)), ("Car", dec!(20), dec!(20))]);
}

#[test]
fn test_overview_trend_window() {
    let o = overview();
    assert_eq!(
        o.monthly_category_spend,
        vec![
            spend("2024-02", "Food", dec!(100)),
            spend("2024-03", "Car", dec!(20)),
            spend("2024-03", "Food", dec!(80)),
        ]
    );

    let income: Vec<(MonthKey, Decimal)> =
        o.monthly_income.iter().map(|m| (m.month, m.total)).collect();
    assert_eq!(
        income,
        vec![(month("2024-01"), dec!(3000)), (month("2024-03"), dec!(600))]
    );

    assert_eq!(o.monthly_savings.len(), 1);
    assert_eq!(o.monthly_savings[0].total, dec!(200));
}

#[test]
fn test_overview_recent_newest_first() {
    let o = overview();
    assert_eq!(o.recent_transactions.len(), 6);
    assert_eq!(o.recent_transactions[0].category, "Gym");
    assert!(o
        .recent_transactions
        .windows(2)
        .all(|w| w[0].date >= w[1].date));
}

#[test]
fn test_overview_recent_is_capped() {
    let expenses: Vec<Expense> = (1..=15)
        .map(|day| expense(dec!(1), "Food", &format!("2024-03-{day:02}")))
        .collect();
    let o = DashboardOverview::compute(&expenses, &[], &[], &[], date("2024-03-20"));
    assert_eq!(o.recent_transactions.len(), 10);
    assert_eq!(o.recent_transactions[0].date, date("2024-03-15"));
    assert_eq!(o.expenses_mom_percentage, None);
    assert_eq!(o.income_total_month, dec!(0));
}
