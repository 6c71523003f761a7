//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account record, account types and key layout
//! - `amount`: Parsing of amount and integer arguments
//! - `invocation`: Dispatchable functions and invocation records
//! - `error`: Error types for the ledger

pub mod account;
pub mod amount;
pub mod error;
pub mod invocation;

pub use account::{account_key, Account, AccountType, ACCOUNT_KEY_PREFIX};
pub use error::LedgerError;
pub use invocation::{Function, InitMode, Invocation, Sequence};
