//! Synchronous script reader with iterator interface
//!
//! Provides a streaming iterator over invocations from a script file.
//! Delegates script format concerns to the script_format module.
//!
//! # Design
//!
//! The SyncReader uses csv::Reader without headers and with flexible record
//! lengths, since every function takes its own number of arguments. Records
//! are read one at a time; comments and blank records are skipped without
//! consuming a sequence number.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding `Result<Invocation, String>`
//! for each dispatchable record:
//!
//! ```no_run
//! use cash_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("script.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(invocation) => println!("Dispatching: {:?}", invocation),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found) are returned from `new()`
//! - Unreadable records are yielded as Err variants with their line number

use crate::io::script_format::convert_script_record;
use crate::types::{Invocation, Sequence};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    record: StringRecord,
    line_num: usize,
    next_seq: Sequence,
}

impl SyncReader {
    /// Open a script file for streaming
    ///
    /// # Errors
    ///
    /// Returns an error message when the file cannot be opened.
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            record: StringRecord::new(),
            line_num: 0,
            next_seq: 1,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<Invocation, String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(false) => return None,
                Ok(true) => {
                    self.line_num = self
                        .record
                        .position()
                        .map_or(self.line_num + 1, |pos| pos.line() as usize);

                    if let Some(invocation) = convert_script_record(self.next_seq, &self.record) {
                        self.next_seq += 1;
                        return Some(Ok(invocation));
                    }
                }
                Err(e) => {
                    self.line_num += 1;
                    return Some(Err(format!(
                        "Line {}: CSV parse error: {}",
                        self.line_num, e
                    )));
                }
            }
        }
    }
}
