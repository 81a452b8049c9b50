//! Delimited-text reading.

mod options;
mod reader;

pub use options::{CsvReadOptions, DEFAULT_NULL_TOKENS};
pub use reader::{dedupe_headers, read_raw_csv, read_raw_csv_from_reader};
