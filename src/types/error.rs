//! Error types for the cash ledger
//!
//! This module defines every error that the ledger logic can surface to a caller.
//! Errors carry the offending identifier or argument so a failed invocation can be
//! diagnosed from its message alone.
//!
//! # Error Categories
//!
//! - **Argument Errors**: wrong argument count, unknown account type, unparsable amounts
//! - **Lifecycle Errors**: duplicate accounts, missing accounts or raw entities
//! - **Balance Errors**: insufficient funds, arithmetic overflow
//! - **State Errors**: encoding failures and state accessor failures

use crate::state::StateError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
///
/// Every operation fails fast with one of these variants; nothing is retried
/// locally. The only condition that is deliberately not surfaced is the
/// empty-record leniency of account creation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// The invoked function received the wrong number of arguments
    #[error("Incorrect number of arguments for {function}: expecting {expected}, got {actual}")]
    InvalidArgumentCount {
        /// Function name as dispatched
        function: String,
        /// Accepted argument count
        expected: usize,
        /// Argument count actually received
        actual: usize,
    },

    /// Account type is not one of ADMIN, CORPORATE, NGO, VENDOR
    #[error("Invalid account type '{account_type}'")]
    InvalidAccountType {
        /// The rejected type string
        account_type: String,
    },

    /// An amount or integer value could not be parsed or is out of range
    #[error("Invalid amount '{amount}' for {context}")]
    InvalidAmount {
        /// The raw argument
        amount: String,
        /// Which account, entity or operation the amount belongs to
        context: String,
    },

    /// An account is already stored under this id
    #[error("Account already exists for user {id}")]
    AccountAlreadyExists {
        /// Account id
        id: String,
    },

    /// No decodable account is stored under this id
    #[error("Account not found: {id}")]
    AccountNotFound {
        /// Account id
        id: String,
    },

    /// No raw entity is stored under this name
    #[error("Entity not found: {name}")]
    EntityNotFound {
        /// Raw entity name
        name: String,
    },

    /// Sender balance does not cover the transfer
    #[error("Insufficient funds for account {id}: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Sender account id
        id: String,
        /// Sender balance before the transfer
        available: Decimal,
        /// Requested transfer amount
        requested: Decimal,
    },

    /// Balance arithmetic would overflow
    #[error("Arithmetic overflow in {operation} for {id}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account id or raw entity name
        id: String,
    },

    /// A stored record could not be encoded or decoded
    #[error("Encoding error for '{key}': {message}")]
    EncodingError {
        /// State key of the record
        key: String,
        /// Underlying encoder/decoder message
        message: String,
    },

    /// The state accessor failed
    #[error("I/O error for key '{key}': {message}")]
    IoError {
        /// State key being accessed
        key: String,
        /// Backend failure message
        message: String,
    },

    /// The dispatcher does not know this function
    #[error("Received unknown function invocation '{function}'")]
    UnknownFunction {
        /// The rejected function name
        function: String,
    },

    /// Removing a raw entity failed in the state accessor
    #[error("Failed to delete state for {name}: {message}")]
    DeleteFailed {
        /// Raw entity name
        name: String,
        /// Backend failure message
        message: String,
    },
}

impl From<StateError> for LedgerError {
    fn from(error: StateError) -> Self {
        match error {
            StateError::Backend { key, message } => LedgerError::IoError { key, message },
            StateError::Snapshot { message } => LedgerError::IoError {
                key: String::new(),
                message,
            },
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an InvalidArgumentCount error
    pub fn invalid_argument_count(function: &str, expected: usize, actual: usize) -> Self {
        LedgerError::InvalidArgumentCount {
            function: function.to_string(),
            expected,
            actual,
        }
    }

    /// Create an InvalidAccountType error
    pub fn invalid_account_type(account_type: &str) -> Self {
        LedgerError::InvalidAccountType {
            account_type: account_type.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str, context: &str) -> Self {
        LedgerError::InvalidAmount {
            amount: amount.to_string(),
            context: context.to_string(),
        }
    }

    /// Create an AccountAlreadyExists error
    pub fn account_already_exists(id: &str) -> Self {
        LedgerError::AccountAlreadyExists { id: id.to_string() }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(id: &str) -> Self {
        LedgerError::AccountNotFound { id: id.to_string() }
    }

    /// Create an EntityNotFound error
    pub fn entity_not_found(name: &str) -> Self {
        LedgerError::EntityNotFound {
            name: name.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(id: &str, available: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            id: id.to_string(),
            available,
            requested,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, id: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            id: id.to_string(),
        }
    }

    /// Create an EncodingError error
    pub fn encoding(key: &str, message: impl ToString) -> Self {
        LedgerError::EncodingError {
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    /// Create an UnknownFunction error
    pub fn unknown_function(function: &str) -> Self {
        LedgerError::UnknownFunction {
            function: function.to_string(),
        }
    }

    /// Render the structured `{"Error":"..."}` body returned by the query path
    ///
    /// Existing callers match on these exact bytes, so the two messages the
    /// query path has always produced are kept verbatim.
    pub fn query_payload(&self) -> String {
        let message = match self {
            LedgerError::EntityNotFound { name } => format!("Nil amount for {name}"),
            LedgerError::IoError { key, .. } => format!("Failed to get state for {key}"),
            other => other.to_string(),
        };
        serde_json::json!({ "Error": message }).to_string()
    }
}
