#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

// ── format_currency ───────────────────────────────────────────

#[test]
fn test_format_currency_positive() {
    assert_eq!(format_currency(dec!(1234.56)), "€1,234.56");
}

#[test]
fn test_format_currency_negative() {
    assert_eq!(format_currency(dec!(-42.5)), "-€42.50");
}

#[test]
fn test_format_currency_zero() {
    assert_eq!(format_currency(dec!(0)), "€0.00");
}

#[test]
fn test_format_currency_millions() {
    assert_eq!(format_currency(dec!(1234567.891)), "€1,234,567.89");
}

#[test]
fn test_format_currency_small() {
    assert_eq!(format_currency(dec!(999)), "€999.00");
}

#[test]
fn test_format_currency_uses_symbol() {
    assert!(format_currency(dec!(1)).starts_with(CURRENCY_SYMBOL));
}

#[test]
fn test_group_thousands() {
    assert_eq!(group_thousands("0"), "0");
    assert_eq!(group_thousands("100"), "100");
    assert_eq!(group_thousands("1000"), "1,000");
    assert_eq!(group_thousands("123456"), "123,456");
    assert_eq!(group_thousands("1234567"), "1,234,567");
}

#[test]
fn test_format_optional_currency() {
    assert_eq!(format_optional_currency(None), "—");
    assert_eq!(format_optional_currency(Some(dec!(5))), "€5.00");
}

// ── percentages ───────────────────────────────────────────────

#[test]
fn test_format_percentage() {
    assert_eq!(format_percentage(dec!(80)), "80%");
    assert_eq!(format_percentage(dec!(33.3333)), "33%");
    assert_eq!(format_percentage(dec!(0)), "0%");
}

#[test]
fn test_format_mom() {
    assert_eq!(format_mom(Some(dec!(12.5))), "MoM: +12.5%");
    assert_eq!(format_mom(Some(dec!(-3.24))), "MoM: -3.2%");
    assert_eq!(format_mom(Some(dec!(0))), "MoM: +0.0%");
    assert_eq!(format_mom(None), "MoM: —");
}

#[test]
fn test_progress_bar() {
    assert_eq!(progress_bar(dec!(0), 10), "░░░░░░░░░░");
    assert_eq!(progress_bar(dec!(50), 10), "█████░░░░░");
    assert_eq!(progress_bar(dec!(100), 4), "████");
    assert_eq!(progress_bar(dec!(250), 4), "████");
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("Entertainment", 6), "Enter…");
}

#[test]
fn test_truncate_exact_length() {
    assert_eq!(truncate("Food", 4), "Food");
    assert_eq!(truncate("Foods", 4), "Foo…");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_unicode() {
    assert_eq!(truncate("café résumé", 5), "café…");
}
