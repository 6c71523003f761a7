//! Processing strategy module for script execution
//!
//! This module defines the Strategy pattern for complete script pipelines,
//! covering script parsing, dispatch into the ledger and result output. The
//! synchronous and the asynchronous batch implementations can be selected at
//! runtime and produce identical output for the same script.

use crate::cli::StrategyType;
use crate::core::ChaincodeConfig;
use crate::state::MemoryState;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// A complete script pipeline
pub trait ProcessingStrategy: Send + Sync {
    /// Run the script at `input_path` against `state`
    ///
    /// Writes one result row per dispatched invocation to `output` and
    /// returns the state as it stands after the last invocation.
    ///
    /// # Errors
    ///
    /// Only fatal conditions (unreadable script, failed output) are errors;
    /// a failing invocation is reported in its result row.
    fn process(
        &self,
        input_path: &Path,
        state: MemoryState,
        output: &mut dyn Write,
    ) -> Result<MemoryState, String>;
}

/// Build the strategy selected on the command line
///
/// `batch` only affects the async strategy; `None` uses the defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    chaincode: ChaincodeConfig,
    batch: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(chaincode)),
        StrategyType::Async => {
            let batch = batch.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(chaincode, batch))
        }
    }
}
