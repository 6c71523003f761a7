//! Argument parsing for monetary amounts and raw integer values
//!
//! Invocation arguments arrive as strings. Account balances are decimals and
//! accept plain or scientific notation; raw entity values are signed integers.

use super::error::LedgerError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a real-valued amount
///
/// Accepts plain decimals (`"1000.0"`, `"-3"`) and scientific notation
/// (`"1e3"`). Leading and trailing whitespace is ignored.
pub fn parse_amount(raw: &str, context: &str) -> Result<Decimal, LedgerError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| LedgerError::invalid_amount(raw, context))
}

/// Parse an amount that must be strictly greater than zero
pub fn parse_positive_amount(raw: &str, context: &str) -> Result<Decimal, LedgerError> {
    let amount = parse_amount(raw, context)?;
    if amount <= Decimal::ZERO {
        return Err(LedgerError::invalid_amount(raw, context));
    }
    Ok(amount)
}

/// Parse a signed integer value for the raw entity ledger
pub fn parse_integer(raw: &str, context: &str) -> Result<i64, LedgerError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| LedgerError::invalid_amount(raw, context))
}

/// Largest number of accounts a single `createAccounts` call may bootstrap
pub const MAX_BOOTSTRAP_ACCOUNTS: u32 = 10_000;

/// Parse the `createAccounts` count
///
/// Must be an integer between 0 and [`MAX_BOOTSTRAP_ACCOUNTS`] inclusive.
pub fn parse_account_count(raw: &str) -> Result<u32, LedgerError> {
    parse_integer(raw, "createAccounts")
        .ok()
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n <= MAX_BOOTSTRAP_ACCOUNTS)
        .ok_or_else(|| LedgerError::invalid_amount(raw, "createAccounts"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("1000.0", Decimal::new(10000, 1))]
    #[case::integer("500", Decimal::new(500, 0))]
    #[case::negative("-2.5", Decimal::new(-25, 1))]
    #[case::scientific("1e3", Decimal::new(1000, 0))]
    #[case::padded(" 42 ", Decimal::new(42, 0))]
    fn test_parse_amount_valid(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(raw, "test").unwrap(), expected);
    }

    #[rstest]
    #[case::word("ten")]
    #[case::empty("")]
    #[case::nan("NaN")]
    #[case::two_points("1.2.3")]
    fn test_parse_amount_invalid(#[case] raw: &str) {
        let err = parse_amount(raw, "alice").unwrap_err();
        assert_eq!(err, LedgerError::invalid_amount(raw, "alice"));
    }

    #[rstest]
    #[case::zero("0", false)]
    #[case::positive("300.0", true)]
    #[case::negative("-5", false)]
    fn test_parse_positive_amount(#[case] raw: &str, #[case] accepted: bool) {
        assert_eq!(parse_positive_amount(raw, "test").is_ok(), accepted);
    }

    #[rstest]
    #[case::positive("100", Some(100))]
    #[case::negative("-7", Some(-7))]
    #[case::float("1.5", None)]
    #[case::word("abc", None)]
    fn test_parse_integer(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_integer(raw, "a").ok(), expected);
    }

    #[rstest]
    #[case::zero("0", Some(0))]
    #[case::padded(" 3 ", Some(3))]
    #[case::at_limit("10000", Some(MAX_BOOTSTRAP_ACCOUNTS))]
    #[case::above_limit("10001", None)]
    #[case::huge("4000000000", None)]
    #[case::negative("-1", None)]
    #[case::fraction("2.5", None)]
    fn test_parse_account_count(#[case] raw: &str, #[case] expected: Option<u32>) {
        match expected {
            Some(count) => assert_eq!(parse_account_count(raw).unwrap(), count),
            None => assert_eq!(
                parse_account_count(raw).unwrap_err(),
                LedgerError::invalid_amount(raw, "createAccounts")
            ),
        }
    }
}
