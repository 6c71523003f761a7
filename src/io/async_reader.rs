//! Asynchronous script reader with batch interface
//!
//! Provides a streaming interface over invocations from a script source.
//! Supports batch reading for the parallel strategy.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming, header-less CSV parsing
//! - the script_format module for record conversion
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of Invocations
//!                  ↓
//!         script_format module
//!        (convert_script_record)
//! ```
//!
//! Sequence numbers continue across batches, so a result can always be traced
//! back to its position in the script.

use crate::io::script_format::convert_script_record;
use crate::types::{Invocation, Sequence};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncReader<R>,
    next_seq: Sequence,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_reader(reader);

        Self {
            csv_reader,
            next_seq: 1,
        }
    }

    /// Read up to `batch_size` invocations
    ///
    /// Comments and blank records are skipped; unreadable records are logged
    /// and skipped. An empty batch means the source is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<Invocation> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.records();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(record)) => {
                    if let Some(invocation) = convert_script_record(self.next_seq, &record) {
                        self.next_seq += 1;
                        batch.push(invocation);
                    }
                }
                Some(Err(e)) => warn!(error = %e, "skipping unreadable script record"),
                None => break,
            }
        }

        batch
    }
}
