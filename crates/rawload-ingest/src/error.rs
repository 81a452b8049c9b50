//! Error types for reading contracts and raw CSV files.

use std::path::PathBuf;

use rawload_model::ConfigError;
use thiserror::Error;

/// Errors that can occur while loading inputs.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// The CSV reader rejected the file.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A data row has more fields than the header.
    #[error("{path}: line {line} has {found} fields, header has {expected}")]
    RaggedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Failed to write CSV output.
    #[error("failed to write CSV {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The CSV reader only supports single-byte delimiters.
    #[error("unsupported delimiter {delimiter:?}: expected a single ASCII character")]
    UnsupportedDelimiter { delimiter: char },

    /// CSV file has no header row.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    // === Contract Errors ===
    /// The contract is not valid YAML or has the wrong shape.
    #[error("failed to parse contract {path}: {source}")]
    ContractParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The contract parsed but is missing required settings.
    #[error("invalid contract {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    // === DataFrame Errors ===
    /// A raw table column is not text.
    #[error("raw table column '{column}' is not text")]
    NonTextColumn { column: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Map an `io::Error` from opening `path` to the matching variant.
pub(crate) fn open_error(path: &std::path::Path, err: std::io::Error) -> IngestError {
    if err.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: err,
        }
    }
}
