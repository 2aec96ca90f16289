use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Month;

/// Placeholder shown for a KPI whose underlying subset is empty.
pub const NOT_AVAILABLE: &str = "n/a";

/// Format a decimal number with thousands separators and a fixed number
/// of decimal places. Midpoints round away from zero.
///
/// # Examples
///
/// ```
/// use cashflow_core::formatting::format_number;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_number(Decimal::new(12345, 1), 1), "1,234.5");
/// assert_eq!(format_number(Decimal::new(1234567, 0), 0), "1,234,567");
/// assert_eq!(format_number(Decimal::ZERO, 2), "0.00");
/// assert_eq!(format_number(Decimal::new(-98765, 1), 1), "-9,876.5");
/// ```
pub fn format_number(value: Decimal, decimals: u32) -> String {
    let mut rounded =
        value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);

    // Values that round to zero never carry a sign.
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().to_string();
    let (integer_part, frac_part) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits.as_str(), None),
    };

    let mut result = group_thousands(integer_part);
    if let Some(frac) = frac_part {
        result.push('.');
        result.push_str(frac);
    }

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a monetary amount with two decimals, thousands separators and a
/// trailing currency symbol.
///
/// # Examples
///
/// ```
/// use cashflow_core::formatting::format_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_currency(Decimal::new(123456, 2), "€"), "1,234.56 €");
/// assert_eq!(format_currency(Decimal::new(-400, 0), "€"), "-400.00 €");
/// assert_eq!(format_currency(Decimal::ZERO, ""), "0.00");
/// ```
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let number = format_number(amount, 2);
    if symbol.is_empty() {
        number
    } else {
        format!("{} {}", number, symbol)
    }
}

/// Like [`format_currency`] but renders `None` as [`NOT_AVAILABLE`].
pub fn format_optional_currency(amount: Option<Decimal>, symbol: &str) -> String {
    match amount {
        Some(v) => format_currency(v, symbol),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Render a month as `"January 2024"`, or [`NOT_AVAILABLE`].
pub fn format_month(month: Option<Month>) -> String {
    month
        .map(|m| m.label())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    // ── format_number ────────────────────────────────────────────────────────

    #[test]
    fn test_format_number_zero() {
        assert_eq!(format_number(Decimal::ZERO, 0), "0");
        assert_eq!(format_number(Decimal::ZERO, 2), "0.00");
    }

    #[test]
    fn test_format_number_with_thousands() {
        assert_eq!(format_number(dec!(1234.5), 1), "1,234.5");
        assert_eq!(format_number(dec!(1234567), 0), "1,234,567");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(dec!(-9876.5), 1), "-9,876.5");
    }

    #[test]
    fn test_format_number_rounds_midpoint_away_from_zero() {
        assert_eq!(format_number(dec!(1.005), 2), "1.01");
        assert_eq!(format_number(dec!(-2.5), 0), "-3");
    }

    #[test]
    fn test_format_number_pads_scale() {
        assert_eq!(format_number(dec!(0.3), 2), "0.30");
        assert_eq!(format_number(dec!(850.4), 0), "850");
    }

    #[test]
    fn test_format_number_negative_rounding_to_zero_has_no_sign() {
        assert_eq!(format_number(dec!(-0.001), 2), "0.00");
    }

    // ── format_currency ──────────────────────────────────────────────────────

    #[test]
    fn test_format_currency_euro_suffix() {
        assert_eq!(format_currency(dec!(1000), "€"), "1,000.00 €");
        assert_eq!(format_currency(dec!(600.00), "€"), "600.00 €");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-400), "€"), "-400.00 €");
    }

    #[test]
    fn test_format_currency_custom_symbol() {
        assert_eq!(format_currency(dec!(12.5), "EUR"), "12.50 EUR");
    }

    #[test]
    fn test_format_optional_currency_none() {
        assert_eq!(format_optional_currency(None, "€"), "n/a");
        assert_eq!(format_optional_currency(Some(Decimal::ONE), "€"), "1.00 €");
    }

    // ── format_month ─────────────────────────────────────────────────────────

    #[test]
    fn test_format_month() {
        assert_eq!(format_month(Month::new(2024, 1)), "January 2024");
        assert_eq!(format_month(None), "n/a");
    }
}
