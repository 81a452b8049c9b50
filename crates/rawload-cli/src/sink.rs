//! Storage sinks for validated tables.
//!
//! The pipeline hands a [`TypedTable`] to a [`TableSink`] exactly once and
//! never retries. A receipt with `success = false` is turned into
//! [`SinkError::Rejected`] by the caller.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use polars::prelude::Column;
use rawload_ingest::cell_string;
use rawload_transform::TypedTable;
use thiserror::Error;

/// Default sink directory, relative to the working directory.
pub const DEFAULT_TARGET_DIR: &str = "warehouse";

/// What the sink reports back after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkReceipt {
    pub success: bool,
    pub rows_written: usize,
}

#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink accepted the call but reported failure.
    #[error("sink rejected write to table {table}")]
    Rejected { table: String },

    #[error("sink I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("sink failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// A destination for validated tables.
pub trait TableSink {
    /// Write `table` under `table_name`. `overwrite = false` appends.
    fn write(
        &mut self,
        table_name: &str,
        table: &TypedTable,
        overwrite: bool,
    ) -> Result<SinkReceipt, SinkError>;
}

/// Writes each table to `<dir>/<table_name>.csv`.
#[derive(Debug, Clone)]
pub struct CsvDirectorySink {
    dir: PathBuf,
}

impl CsvDirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, table_name: &str) -> PathBuf {
        self.dir.join(format!("{table_name}.csv"))
    }
}

impl TableSink for CsvDirectorySink {
    fn write(
        &mut self,
        table_name: &str,
        table: &TypedTable,
        overwrite: bool,
    ) -> Result<SinkReceipt, SinkError> {
        fs::create_dir_all(&self.dir).map_err(|source| SinkError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(table_name);
        let existing = !overwrite && has_content(&path);
        let file = open_target(&path, overwrite).map_err(|source| SinkError::Io {
            path: path.clone(),
            source,
        })?;
        let rows_written =
            write_rows(file, table, !existing).map_err(|source| SinkError::Csv {
                path: path.clone(),
                source,
            })?;
        Ok(SinkReceipt {
            success: true,
            rows_written,
        })
    }
}

fn has_content(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.len() > 0)
}

fn open_target(path: &Path, overwrite: bool) -> io::Result<File> {
    if overwrite {
        File::create(path)
    } else {
        OpenOptions::new().create(true).append(true).open(path)
    }
}

fn write_rows(file: File, table: &TypedTable, with_header: bool) -> Result<usize, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    let columns: &[Column] = table.frame().get_columns();
    if with_header {
        writer.write_record(columns.iter().map(|column| column.name().as_str()))?;
    }
    for idx in 0..table.height() {
        writer.write_record(
            columns
                .iter()
                .map(|column| cell_string(column, idx).unwrap_or_default()),
        )?;
    }
    writer.flush()?;
    Ok(table.height())
}

/// One write recorded by [`MemorySink`].
#[derive(Debug, Clone)]
pub struct RecordedWrite {
    pub table_name: String,
    pub table: TypedTable,
    pub overwrite: bool,
}

/// Keeps written tables in memory. Used in tests and dry-run tooling.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub writes: Vec<RecordedWrite>,
    reject: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records the call but reports `success = false`.
    pub fn rejecting() -> Self {
        Self {
            writes: Vec::new(),
            reject: true,
        }
    }
}

impl TableSink for MemorySink {
    fn write(
        &mut self,
        table_name: &str,
        table: &TypedTable,
        overwrite: bool,
    ) -> Result<SinkReceipt, SinkError> {
        self.writes.push(RecordedWrite {
            table_name: table_name.to_string(),
            table: table.clone(),
            overwrite,
        });
        Ok(SinkReceipt {
            success: !self.reject,
            rows_written: if self.reject { 0 } else { table.height() },
        })
    }
}
