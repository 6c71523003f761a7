//! CUSIP maturity suffix
//!
//! The last two characters of a CUSIP-style paper identifier encode its
//! maturity date: the 7th character encodes the month and the 8th the day of
//! the month. Letters I and O are never used.

use crate::types::LedgerError;
use chrono::{DateTime, Datelike, Duration};

/// 7th character codes, indexed by value - 1
///
/// Only the first twelve entries are reachable from a calendar month.
pub static SEVENTH_DIGIT: [&str; 24] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "J", "K", "L", "M", "N", "P", "Q", "R", "S", "T", "U",
    "V", "W", "X", "Y", "Z",
];

/// 8th character codes, indexed by day of month - 1
pub static EIGHTH_DIGIT: [&str; 31] = [
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "A", "B", "C", "D", "E", "F", "G", "H", "J", "K",
    "L", "M", "N", "P", "Q", "R", "S", "T", "U", "V", "W", "X",
];

/// Compute the two-character suffix for paper issued at `issue_date_ms`
/// (milliseconds since the Unix epoch, UTC) that matures `days` later
pub fn maturity_suffix(issue_date_ms: &str, days: i64) -> Result<String, LedgerError> {
    let invalid = || LedgerError::invalid_amount(issue_date_ms, "issue date");

    let millis = issue_date_ms.trim().parse::<i64>().map_err(|_| invalid())?;
    let issued = DateTime::from_timestamp_millis(millis).ok_or_else(invalid)?;
    let maturity = Duration::try_days(days)
        .and_then(|offset| issued.checked_add_signed(offset))
        .ok_or_else(invalid)?;

    let month = SEVENTH_DIGIT[maturity.month0() as usize];
    let day = EIGHTH_DIGIT[maturity.day0() as usize];
    Ok(format!("{month}{day}"))
}
