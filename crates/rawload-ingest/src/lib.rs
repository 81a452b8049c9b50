//! Input side of rawload.
//!
//! This crate turns files on disk into the values the pipeline works on:
//!
//! - **Contracts**: YAML contract files into validated [`rawload_model::Contract`]s
//! - **CSV Reading**: delimited text into an all-text [`RawTable`], with
//!   configurable null tokens on top of the usual defaults
//! - **Profiling**: delimiter sniffing, row and null counts, Markdown reports
//! - **Sampling**: leading-row samples of large files
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use rawload_ingest::{CsvReadOptions, load_contract, read_raw_csv};
//!
//! let contract = load_contract(Path::new("etl/config/annual_production.yml"))?;
//! let options = CsvReadOptions::for_contract(&contract);
//! let raw = read_raw_csv(Path::new("data/raw/production.csv"), &options)?;
//! ```

mod contract;
mod csv;
mod error;
pub mod polars_utils;
pub mod profile;
mod raw_table;
pub mod sample;

// === Error Types ===
pub use error::{IngestError, Result};

// === Contracts ===
pub use contract::{load_contract, parse_contract};

// === CSV Reading ===
pub use self::csv::{
    CsvReadOptions, DEFAULT_NULL_TOKENS, dedupe_headers, read_raw_csv, read_raw_csv_from_reader,
};
pub use raw_table::RawTable;

// === Utilities ===
pub use polars_utils::{any_to_string, cell_string, format_float};
pub use profile::{CsvProfile, profile_csv, render_markdown, sniff_delimiter, write_profile_report};
pub use sample::{DEFAULT_SAMPLE_ROWS, SampleSummary, default_sample_path, write_sample};
