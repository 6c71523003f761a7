//! Cash Ledger Library
//! # Overview
//!
//! This library implements a small ledger-state application: named accounts
//! holding cash balances, created exactly once and moved between by validated
//! transfers, on top of a get/put/delete key/value store. A script host runs
//! CSV invocation scripts through it with a sync or an async strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Invocation, LedgerError, etc.)
//! - [`state`] - State accessor trait and in-memory stores
//! - [`core`] - Ledger logic:
//!   - [`core::registry`] - Account creation, lookup and persistence
//!   - [`core::transfer`] - Cash movement between accounts
//!   - [`core::legacy`] - Raw named integer entities
//!   - [`core::chaincode`] - Function dispatcher
//! - [`io`] - Script parsing and result output
//! - [`strategy`] - Sync and async processing pipelines
//! - [`cli`] - CLI arguments parsing
//!
//! # Functions
//!
//! The dispatcher understands:
//!
//! - **createAccount**: create an account with a type and starting balance
//! - **createAccounts**: bootstrap `company1..companyN` ADMIN accounts
//! - **transaction**: move cash between two existing accounts
//! - **GetCompany**: read an account record
//! - **init**: bootstrap, as `createAccount` or as the raw-entity seed
//! - **invoke**, **delete**, **query**: raw named integer entities
//!
//! # State Layout
//!
//! - `acct:<id>` holds the account as JSON with `id`, `prefix`,
//!   `cashBalance` and `assetIds`
//! - `<name>` holds a raw entity as a decimal integer string

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod state;
pub mod strategy;
pub mod types;

pub use core::{AccountRegistry, Chaincode, ChaincodeConfig, LegacyLedger, Surface, TransferEngine};
pub use io::write_results_csv;
pub use state::{MemoryState, SharedState, StateAccessor, StateError};
pub use types::{Account, AccountType, Function, InitMode, Invocation, LedgerError, Sequence};
