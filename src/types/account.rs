//! Account-related types for the cash ledger
//!
//! This module defines the persisted Account record, the account type
//! classification and the key layout used to store accounts.

use super::error::LedgerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key prefix under which every account record is stored
pub const ACCOUNT_KEY_PREFIX: &str = "acct:";

/// Build the state key for an account id
pub fn account_key(id: &str) -> String {
    format!("{ACCOUNT_KEY_PREFIX}{id}")
}

/// Account classification
///
/// The type only determines the 4-character suffix of the display prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Admin,
    Corporate,
    Ngo,
    Vendor,
}

impl AccountType {
    /// Suffix appended to the id to build the display prefix
    pub fn suffix(self) -> &'static str {
        match self {
            AccountType::Admin => "000A",
            AccountType::Corporate => "000C",
            AccountType::Ngo => "000N",
            AccountType::Vendor => "000V",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Admin => "ADMIN",
            AccountType::Corporate => "CORPORATE",
            AccountType::Ngo => "NGO",
            AccountType::Vendor => "VENDOR",
        }
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(AccountType::Admin),
            "CORPORATE" => Ok(AccountType::Corporate),
            "NGO" => Ok(AccountType::Ngo),
            "VENDOR" => Ok(AccountType::Vendor),
            other => Err(LedgerError::invalid_account_type(other)),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted account record
///
/// Stored as JSON under [`account_key`]. Field names follow the established
/// wire shape (`id`, `prefix`, `cashBalance`, `assetIds`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, immutable once created
    pub id: String,

    /// Display code: id followed by the account type suffix
    pub prefix: String,

    /// Cash balance
    ///
    /// Only the transfer engine mutates it after creation. Serialized as a
    /// JSON number carrying every decimal digit.
    #[serde(rename = "cashBalance", with = "exact_number")]
    pub cash_balance: Decimal,

    /// Asset identifiers held by the account, in insertion order
    ///
    /// Not used by transfers but must survive a decode/encode cycle. Records
    /// written without the field decode with an empty list.
    #[serde(rename = "assetIds", default)]
    pub asset_ids: Vec<String>,
}

impl Account {
    /// Create a new account with no assets
    pub fn new(id: &str, account_type: AccountType, cash_balance: Decimal) -> Self {
        Account {
            id: id.to_string(),
            prefix: format!("{id}{}", account_type.suffix()),
            cash_balance,
            asset_ids: Vec::new(),
        }
    }

    /// State key of this account
    pub fn key(&self) -> String {
        account_key(&self.id)
    }

    /// Encode the account for storage
    pub fn encode(&self) -> Result<Vec<u8>, LedgerError> {
        serde_json::to_vec(self).map_err(|e| LedgerError::encoding(&self.key(), e))
    }

    /// Decode a stored account record
    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Exact JSON number form of a balance
///
/// Written with trailing zeros stripped and at least one fractional digit
/// (`700.0`, `99999.5`). Reads accept any JSON number, exponents included.
mod exact_number {
    use rust_decimal::Decimal;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let normalized = value.normalize();
        let text = if normalized.scale() == 0 {
            format!("{normalized}.0")
        } else {
            normalized.to_string()
        };
        serde_json::Number::from_str(&text)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let text = serde_json::Number::deserialize(deserializer)?.to_string();
        // a whole number written as `N.0` may sit at the top of the range
        let plain = match text.strip_suffix(".0") {
            Some(whole) if !whole.contains(['.', 'e', 'E']) => whole,
            _ => text.as_str(),
        };
        Decimal::from_str(plain)
            .or_else(|_| Decimal::from_scientific(plain))
            .map_err(|_| D::Error::custom(format!("balance {text} is out of range")))
    }
}
