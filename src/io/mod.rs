//! I/O module
//!
//! Handles script parsing and result output.
//!
//! # Components
//!
//! - `script_format` - Script format handling (record conversion, result serialization)
//! - `sync_reader` - Synchronous script reader with iterator interface
//! - `async_reader` - Asynchronous script reader with batch reading interface

pub mod async_reader;
pub mod script_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use script_format::{convert_script_record, render_result, write_results_csv};
pub use sync_reader::SyncReader;
