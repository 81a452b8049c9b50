//! Read a delimited file into a [`RawTable`], every cell as text.

use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::error::{IngestError, Result, open_error};
use crate::raw_table::RawTable;

use super::options::CsvReadOptions;

/// Reads a CSV file with the given delimiter and null tokens.
///
/// No type inference happens here: cells are kept verbatim (whitespace
/// included) unless they exactly match a null token.
pub fn read_raw_csv(path: &Path, options: &CsvReadOptions) -> Result<RawTable> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    read_raw_csv_from_reader(file, options, path)
}

/// Same as [`read_raw_csv`] over any reader; `origin` is used in errors.
pub fn read_raw_csv_from_reader<R: Read>(
    reader: R,
    options: &CsvReadOptions,
    origin: &Path,
) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let raw_headers: Vec<String> = reader
        .headers()
        .map_err(|source| csv_error(origin, source))?
        .iter()
        .map(str::to_string)
        .collect();
    if raw_headers.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: origin.to_path_buf(),
        });
    }
    let headers = dedupe_headers(&raw_headers);

    let tokens = options.null_tokens();
    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| csv_error(origin, source))?;
        if record.len() > headers.len() {
            return Err(IngestError::RaggedRow {
                path: origin.to_path_buf(),
                line: record.position().map_or(0, csv::Position::line),
                expected: headers.len(),
                found: record.len(),
            });
        }
        rows.push(parse_record(&record, &tokens));
    }

    debug!(
        path = %origin.display(),
        rows = rows.len(),
        columns = headers.len(),
        "read raw csv"
    );
    RawTable::from_rows(&headers, &rows)
}

fn parse_record(record: &csv::StringRecord, tokens: &HashSet<&str>) -> Vec<Option<String>> {
    record
        .iter()
        .map(|value| {
            if tokens.contains(value) {
                None
            } else {
                Some(value.to_string())
            }
        })
        .collect()
}

fn csv_error(path: &Path, source: csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: path.to_path_buf(),
        source,
    }
}

/// Make header names unique and non-empty.
///
/// Blank names become `Unnamed: <index>`; repeated names get `.1`, `.2`, ...
/// suffixes in order of appearance.
pub fn dedupe_headers(raw: &[String]) -> Vec<String> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut headers = Vec::with_capacity(raw.len());
    for (idx, header) in raw.iter().enumerate() {
        let base = header.strip_prefix('\u{feff}').unwrap_or(header);
        let base = if base.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            base.to_string()
        };
        let mut name = base.clone();
        let mut suffix = 1usize;
        while seen.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        if name != base {
            warn!(header = %base, renamed = %name, "duplicate CSV header renamed");
        }
        seen.insert(name.clone());
        headers.push(name);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(content: &str, options: &CsvReadOptions) -> RawTable {
        read_raw_csv_from_reader(content.as_bytes(), options, Path::new("inline.csv"))
            .expect("read csv")
    }

    #[test]
    fn keeps_cells_verbatim_as_text() {
        let table = read("id,qty\n007, 12 \n", &CsvReadOptions::default());
        assert_eq!(table.headers(), vec!["id", "qty"]);
        assert_eq!(
            table.column_values("id"),
            Some(vec![Some("007".to_string())])
        );
        assert_eq!(
            table.column_values("qty"),
            Some(vec![Some(" 12 ".to_string())])
        );
    }

    #[test]
    fn quoted_thousands_stay_in_one_cell() {
        let table = read("qty\n\"1,000\"\n", &CsvReadOptions::default());
        assert_eq!(
            table.column_values("qty"),
            Some(vec![Some("1,000".to_string())])
        );
    }

    #[test]
    fn default_and_contract_null_tokens() {
        let options = CsvReadOptions::default().with_na_values(["-"]);
        let table = read("a\nNA\n-\nx\n", &options);
        assert_eq!(
            table.column_values("a"),
            Some(vec![None, None, Some("x".to_string())])
        );
    }

    #[test]
    fn empty_field_is_null() {
        let table = read("a,b\n1,\n", &CsvReadOptions::default());
        assert_eq!(table.column_values("b"), Some(vec![None]));
    }

    #[test]
    fn honours_custom_delimiter() {
        let options = CsvReadOptions::default().with_delimiter(b'|');
        let table = read("a|b\n1|2\n", &options);
        assert_eq!(table.headers(), vec!["a", "b"]);
    }

    #[test]
    fn short_rows_are_padded_and_long_rows_fail() {
        let table = read("a,b\n1\n", &CsvReadOptions::default());
        assert_eq!(table.column_values("b"), Some(vec![None]));

        let err = read_raw_csv_from_reader(
            "a,b\n1,2,3\n".as_bytes(),
            &CsvReadOptions::default(),
            Path::new("inline.csv"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            IngestError::RaggedRow {
                line: 2,
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn headers_are_deduplicated() {
        let raw: Vec<String> = ["\u{feff}id", "x", "x", "", "x"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            dedupe_headers(&raw),
            vec!["id", "x", "x.1", "Unnamed: 3", "x.2"]
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_raw_csv(Path::new("/no/such/file.csv"), &CsvReadOptions::default())
            .unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }
}
