//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It streams invocations from the `SyncReader`
//! straight into one `Chaincode` that owns the state for the whole run.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - Script parsing to `SyncReader` (iterator interface)
//! - Dispatch to `Chaincode`
//! - Output to `script_format::write_results_csv`
//!
//! Results are collected before writing because the async strategy can only
//! write once a run has finished, and both strategies share one writer.

use crate::core::{Chaincode, ChaincodeConfig, ProcessingResult};
use crate::io::script_format::write_results_csv;
use crate::io::sync_reader::SyncReader;
use crate::state::MemoryState;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncProcessingStrategy {
    chaincode: ChaincodeConfig,
}

impl SyncProcessingStrategy {
    pub fn new(chaincode: ChaincodeConfig) -> Self {
        Self { chaincode }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        input_path: &Path,
        state: MemoryState,
        output: &mut dyn Write,
    ) -> Result<MemoryState, String> {
        let reader = SyncReader::new(input_path)?;
        let mut chaincode = Chaincode::new(state, self.chaincode);
        let mut results = Vec::new();

        for record in reader {
            match record {
                Ok(invocation) => {
                    let result = chaincode.dispatch(&invocation);
                    results.push(ProcessingResult { invocation, result });
                }
                Err(e) => warn!(error = %e, "skipping unreadable script record"),
            }
        }

        info!(invocations = results.len(), "script processed");
        write_results_csv(&results, output)?;

        Ok(chaincode.into_state())
    }
}
