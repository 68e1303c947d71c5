//! Utility functions for formatting and parsing user-facing values
//!
//! This module provides centralized formatting utilities for consistent
//! display of currency, BTC and percentage values, and the tolerant parsers
//! used by the interactive prompts (Brazilian number and date conventions).

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::SatstackError;

/// Satoshis per whole bitcoin
pub const SATS_PER_BTC: i64 = 100_000_000;

/// Largest quantity accepted for one purchase: the 21 million BTC supply cap
pub const MAX_SATS: i64 = 21_000_000 * SATS_PER_BTC;

/// Largest amount (in absolute value) accepted from a prompt: R$ 1 quadrillion
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

static NON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").expect("valid regex"));

/// Currency symbol options for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySymbol {
    /// "R$ " prefix (Brazilian Real)
    BRL,
    /// "$ " prefix (US Dollar, still rendered with Brazilian separators)
    USD,
    /// No currency symbol (percentages, table cells)
    None,
}

/// Core formatting function with full control over output.
///
/// Formats a Decimal value using Brazilian locale conventions:
/// - Thousands separator: `.` (period)
/// - Decimal separator: `,` (comma)
///
/// # Examples
/// ```
/// use satstack::utils::{format_currency_with_width, CurrencySymbol};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234.56), 0, CurrencySymbol::BRL),
///     "R$ 1.234,56"
/// );
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234), 15, CurrencySymbol::None),
///     "       1.234,00"
/// );
/// ```
pub fn format_currency_with_width(value: Decimal, width: usize, symbol: CurrencySymbol) -> String {
    let is_negative = value < Decimal::ZERO;
    let abs_value = value.abs();

    let formatted = format!("{:.2}", abs_value);
    let (integer_part, decimal_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    // Add thousands separators (.) to integer part
    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec!['.', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    let prefix = match symbol {
        CurrencySymbol::BRL => "R$ ",
        CurrencySymbol::USD => "$ ",
        CurrencySymbol::None => "",
    };

    let result = format!("{}{}{},{}", prefix, sign, with_separators, decimal_part);

    if width > 0 && result.len() < width {
        format!("{:>width$}", result, width = width)
    } else {
        result
    }
}

/// Format as Brazilian Real with symbol: "R$ 1.234,56"
///
/// # Examples
/// ```
/// use satstack::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.56)), "R$ 1.234,56");
/// assert_eq!(format_currency(dec!(-500)), "R$ -500,00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::BRL)
}

/// Format as US Dollar with Brazilian separators: "$ 1.234,56"
pub fn format_usd(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::USD)
}

/// Format number only (no symbol): "1.234,56"
pub fn format_decimal_br(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::None)
}

/// Format a percentage with Brazilian separators: "12,50%"
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", format_decimal_br(value))
}

/// Convert an integer sats amount into whole BTC.
pub fn sats_to_btc(sats: i64) -> Decimal {
    Decimal::new(sats, 8)
}

/// Format a sats amount as BTC with 8 decimal places: "0.00050000"
pub fn format_btc(sats: i64) -> String {
    format!("{:.8}", sats_to_btc(sats))
}

/// Parse a monetary amount typed with Brazilian conventions.
///
/// Dots are thousand separators and a comma is the decimal point, so
/// `"1.234,56"` is 1234.56 and `"1.000"` is 1000.
pub fn parse_decimal_br(input: &str) -> Result<Decimal> {
    let cleaned = input.trim().replace('.', "").replace(',', ".");
    if cleaned.is_empty() {
        return Err(SatstackError::ParseError("empty decimal input".to_string()).into());
    }
    let value = Decimal::from_str(&cleaned).map_err(|err| {
        SatstackError::ParseError(format!("invalid decimal '{}': {}", input, err))
    })?;
    if value.abs() > Decimal::from(MAX_AMOUNT) {
        return Err(SatstackError::ParseError(format!("amount out of range '{}'", input)).into());
    }
    Ok(value)
}

/// Parse a sats quantity, ignoring every non-digit (`"50.000"` is 50000).
pub fn parse_sats(input: &str) -> Result<i64> {
    let digits = NON_DIGITS.replace_all(input.trim(), "");
    if digits.is_empty() {
        return Err(anyhow!("Digite um número."));
    }
    let sats: i64 = digits
        .parse()
        .map_err(|_| anyhow!("Quantidade fora do intervalo: {}", input))?;
    if sats <= 0 {
        return Err(anyhow!("Maior que zero."));
    }
    if sats > MAX_SATS {
        return Err(anyhow!("Acima de 21 milhões de BTC."));
    }
    Ok(sats)
}

/// Parse a purchase date typed as `DD MM YYYY`, `DD/MM/YYYY` or `DD.MM.YYYY`.
///
/// An empty input means `today`.
pub fn parse_date_input(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(today);
    }
    let normalized = trimmed.replace([' ', '.'], "/");
    NaiveDate::parse_from_str(&normalized, "%d/%m/%Y")
        .map_err(|_| SatstackError::ParseError(format!("invalid date '{}'", input)).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency_basic() {
        assert_eq!(format_currency(dec!(1234.56)), "R$ 1.234,56");
        assert_eq!(format_currency(dec!(0.99)), "R$ 0,99");
        assert_eq!(format_currency(dec!(1000000)), "R$ 1.000.000,00");
        assert_eq!(format_currency(dec!(0)), "R$ 0,00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-1234.56)), "R$ -1.234,56");
        assert_eq!(format_currency(dec!(-0.01)), "R$ -0,01");
    }

    #[test]
    fn test_format_usd_and_percent() {
        assert_eq!(format_usd(dec!(65000)), "$ 65.000,00");
        assert_eq!(format_percent(dec!(12.5)), "12,50%");
        assert_eq!(format_percent(dec!(-3)), "-3,00%");
    }

    #[test]
    fn test_format_with_width() {
        let result = format_currency_with_width(dec!(100), 15, CurrencySymbol::BRL);
        assert_eq!(result, "      R$ 100,00");
    }

    #[test]
    fn test_format_btc() {
        assert_eq!(format_btc(50_000), "0.00050000");
        assert_eq!(format_btc(SATS_PER_BTC), "1.00000000");
        assert_eq!(sats_to_btc(2_000_000), dec!(0.02));
    }

    #[test]
    fn test_parse_decimal_br() {
        assert_eq!(parse_decimal_br("1.234,56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal_br("1.000").unwrap(), dec!(1000));
        assert_eq!(parse_decimal_br("250,5").unwrap(), dec!(250.5));
        assert_eq!(parse_decimal_br(" 42 ").unwrap(), dec!(42));
        assert!(parse_decimal_br("").is_err());
        assert!(parse_decimal_br("abc").is_err());
    }

    #[test]
    fn test_parse_decimal_br_rejects_amounts_beyond_limit() {
        assert_eq!(
            parse_decimal_br("1.000.000.000.000.000").unwrap(),
            Decimal::from(MAX_AMOUNT)
        );
        assert!(parse_decimal_br("1.000.000.000.000.001").is_err());
        assert!(parse_decimal_br("79228162514264337593543950335").is_err());
        assert!(parse_decimal_br("-79228162514264337593543950335").is_err());
    }

    #[test]
    fn test_parse_sats_strips_non_digits() {
        assert_eq!(parse_sats("50.000").unwrap(), 50_000);
        assert_eq!(parse_sats("1 000 sats").unwrap(), 1_000);
        assert!(parse_sats("sats").is_err());
        assert!(parse_sats("0").is_err());
        assert!(parse_sats("000").is_err());
    }

    #[test]
    fn test_parse_sats_caps_at_bitcoin_supply() {
        assert_eq!(parse_sats("2100000000000000").unwrap(), MAX_SATS);
        assert!(parse_sats("2100000000000001").is_err());
        assert!(parse_sats("9223372036854775807").is_err());
        assert!(parse_sats("99999999999999999999999").is_err());
    }

    #[test]
    fn test_parse_date_input_separators() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_date_input("05 03 2024", today).unwrap(), expected);
        assert_eq!(parse_date_input("05/03/2024", today).unwrap(), expected);
        assert_eq!(parse_date_input("05.03.2024", today).unwrap(), expected);
        assert_eq!(parse_date_input("", today).unwrap(), today);
        assert!(parse_date_input("31 02 2024", today).is_err());
        assert!(parse_date_input("2024-03-05", today).is_err());
    }
}
