//! Core ledger logic module
//!
//! This module contains the components that operate on ledger state:
//! - `registry` - Account creation, lookup and persistence
//! - `transfer` - Validated cash movement between two accounts
//! - `legacy` - Raw named integer entities
//! - `cusip` - Maturity-date suffix codes
//! - `chaincode` - Function dispatcher over the components above
//! - `batch_processor` - Conflict-free parallel dispatch for the async host

pub mod batch_processor;
pub mod chaincode;
pub mod cusip;
pub mod legacy;
pub mod registry;
pub mod transfer;

pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use chaincode::{Chaincode, ChaincodeConfig, Surface};
pub use cusip::maturity_suffix;
pub use legacy::{query_entity, LegacyLedger};
pub use registry::{read_account, AccountRegistry, BOOTSTRAP_BALANCE};
pub use transfer::TransferEngine;
