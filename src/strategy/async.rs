//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. It dispatches invocations in batches, running
//! non-conflicting invocations of a batch in parallel.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── ChaincodeConfig (init mode and surface)
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch script reading)
//!     └── BatchProcessor (key-conflict partitioning + tokio tasks)
//!         └── SharedState (Arc + DashMap store)
//! ```
//!
//! # Ordering
//!
//! - Batches run one after another, so a batch sees every write of the
//!   batches before it
//! - Within a batch, invocations that may touch a common key run in script
//!   order on one task
//! - Results are written in sequence order, so the output matches the
//!   synchronous strategy

use crate::core::{BatchProcessor, ChaincodeConfig};
use crate::io::async_reader::AsyncReader;
use crate::io::script_format::write_results_csv;
use crate::state::{MemoryState, SharedState};
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    /// Number of invocations read and partitioned together
    pub batch_size: usize,

    /// Worker threads of the tokio runtime
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a config, replacing zero values with the defaults
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid max concurrent batches, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    chaincode: ChaincodeConfig,
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(chaincode: ChaincodeConfig, config: BatchConfig) -> Self {
        Self { chaincode, config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(
        &self,
        input_path: &Path,
        state: MemoryState,
        output: &mut dyn Write,
    ) -> Result<MemoryState, String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let shared = SharedState::from(state);
            let processor = BatchProcessor::new(shared.clone(), self.chaincode);

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // csv-async reads futures::io, tokio files need the compat layer
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut results = Vec::new();
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                debug!(size = batch.len(), "processing batch");
                results.extend(processor.process_batch(batch).await);
            }

            info!(invocations = results.len(), "script processed");
            write_results_csv(&results, output)?;

            Ok(shared.to_memory())
        })
    }
}
