//! Quarantine samples for soft duplicate-key findings.

use std::fs;
use std::path::{Path, PathBuf};

use rawload_model::RowSample;
use thiserror::Error;

/// Default quarantine directory, relative to the working directory.
pub const DEFAULT_QUARANTINE_DIR: &str = "docs/duplicates";

#[derive(Debug, Error)]
pub enum QuarantineError {
    #[error("failed to create quarantine directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write quarantine sample {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Where duplicate samples are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quarantine {
    dir: PathBuf,
}

impl Quarantine {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<raw_table lowercased>_pk_dupes_sample.csv`
    pub fn path_for(&self, raw_table: &str) -> PathBuf {
        self.dir
            .join(format!("{}_pk_dupes_sample.csv", raw_table.to_lowercase()))
    }

    /// Write `sample` as CSV, replacing any earlier sample for the table.
    /// Null cells are written as empty fields.
    pub fn write(&self, raw_table: &str, sample: &RowSample) -> Result<PathBuf, QuarantineError> {
        fs::create_dir_all(&self.dir).map_err(|source| QuarantineError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(raw_table);
        write_sample(&path, sample).map_err(|source| QuarantineError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

impl Default for Quarantine {
    fn default() -> Self {
        Self::new(DEFAULT_QUARANTINE_DIR)
    }
}

fn write_sample(path: &Path, sample: &RowSample) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&sample.headers)?;
    for row in &sample.rows {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    writer.flush()?;
    Ok(())
}
