use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Amounts are shown in euros, en-GB style.
pub(crate) const CURRENCY_SYMBOL: &str = "€";
const THOUSANDS_SEPARATOR: char = ',';
const NO_AMOUNT: &str = "—";

/// Insert a separator every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(digit);
    }
    grouped
}

/// Money with the currency symbol, thousands separators and two decimals,
/// e.g. `-1234567.891` → `"-€1,234,567.89"`.
pub(crate) fn format_currency(val: Decimal) -> String {
    let fixed = format!("{:.2}", val.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if val.is_sign_negative() && !val.is_zero() { "-" } else { "" };
    format!("{sign}{CURRENCY_SYMBOL}{}.{cents}", group_thousands(whole))
}

/// A dash when no amount is set.
pub(crate) fn format_optional_currency(val: Option<Decimal>) -> String {
    val.map(format_currency).unwrap_or_else(|| NO_AMOUNT.to_string())
}

/// Whole-number percentage, e.g. `80%`.
pub(crate) fn format_percentage(val: Decimal) -> String {
    format!("{}%", val.round_dp(0).normalize())
}

/// Month-over-month change with an explicit sign and one decimal place.
pub(crate) fn format_mom(val: Option<Decimal>) -> String {
    match val {
        Some(v) if v >= Decimal::ZERO => format!("MoM: +{:.1}%", v),
        Some(v) => format!("MoM: {:.1}%", v),
        None => format!("MoM: {NO_AMOUNT}"),
    }
}

/// Text progress bar for a 0-100 percentage.
pub(crate) fn progress_bar(percentage: Decimal, width: usize) -> String {
    let clamped = percentage.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let filled = (clamped * Decimal::from(width) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Cut `s` to at most `max` characters, marking the cut with "…".
pub(crate) fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some(_) if max == 0 => String::new(),
        Some(_) => {
            let keep = s.char_indices().nth(max - 1).map_or(0, |(at, _)| at);
            format!("{}…", &s[..keep])
        }
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
