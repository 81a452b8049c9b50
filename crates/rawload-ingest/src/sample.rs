//! Cut a small leading sample out of a large CSV.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tracing::info;

use crate::error::{IngestError, Result, open_error};

/// Data rows kept when no count is given.
pub const DEFAULT_SAMPLE_ROWS: usize = 2000;

/// Where a sample was written and how many data rows it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSummary {
    pub path: PathBuf,
    pub rows: usize,
}

/// `<dir>/<stem>_sample<rows>.csv` next to the input.
pub fn default_sample_path(input: &Path, rows: usize) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "sample".to_string(), |stem| stem.to_string_lossy().into_owned());
    input.with_file_name(format!("{stem}_sample{rows}.csv"))
}

/// Copy the header and the first `rows` data rows of `input` to `out`
/// (or [`default_sample_path`]). Cells are copied verbatim.
pub fn write_sample(input: &Path, out: Option<&Path>, rows: usize) -> Result<SampleSummary> {
    let out_path = out.map_or_else(|| default_sample_path(input, rows), Path::to_path_buf);

    let file = File::open(input).map_err(|e| open_error(input, e))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);
    let read_error = |source| IngestError::CsvParse {
        path: input.to_path_buf(),
        source,
    };
    let write_error = |source| IngestError::CsvWrite {
        path: out_path.clone(),
        source,
    };

    let headers = reader.headers().map_err(read_error)?.clone();
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .from_path(&out_path)
        .map_err(write_error)?;
    writer.write_record(&headers).map_err(write_error)?;

    let mut written = 0usize;
    for record in reader.records().take(rows) {
        let record = record.map_err(read_error)?;
        writer.write_record(&record).map_err(write_error)?;
        written += 1;
    }
    writer.flush().map_err(|source| IngestError::FileWrite {
        path: out_path.clone(),
        source,
    })?;

    info!(path = %out_path.display(), rows = written, "wrote sample");
    Ok(SampleSummary {
        path: out_path,
        rows: written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_sits_beside_input() {
        let path = default_sample_path(Path::new("data/raw/prod.csv"), 2000);
        assert_eq!(path, PathBuf::from("data/raw/prod_sample2000.csv"));
    }

    #[test]
    fn keeps_header_and_first_rows() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("big.csv");
        std::fs::write(&input, "id,name\n1,a\n2,\"b, c\"\n3,d\n").unwrap();

        let summary = write_sample(&input, None, 2).unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.path, dir.path().join("big_sample2.csv"));
        let written = std::fs::read_to_string(&summary.path).unwrap();
        assert_eq!(written, "id,name\n1,a\n2,\"b, c\"\n");
    }

    #[test]
    fn short_file_yields_fewer_rows() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("small.csv");
        let out = dir.path().join("out.csv");
        std::fs::write(&input, "id\n1\n").unwrap();

        let summary = write_sample(&input, Some(&out), 10).unwrap();
        assert_eq!(summary.rows, 1);
        assert_eq!(summary.path, out);
    }
}
