//! Reading raw CSV files as declared by a contract.

use std::fs;
use std::path::Path;

use rawload_ingest::{CsvReadOptions, IngestError, parse_contract, read_raw_csv};

#[test]
fn contract_drives_delimiter_and_null_tokens() {
    let contract = parse_contract(
        "raw_table: wells\nsource_file: wells.csv\ndelimiter: ';'\nna_like_values: ['-']\n",
        Path::new("wells.yml"),
    )
    .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wells.csv");
    fs::write(&path, "api;oil\n001;-\n002; 1,200 \n003;NULL\n").unwrap();

    let raw = read_raw_csv(&path, &CsvReadOptions::for_contract(&contract)).expect("read");
    assert_eq!(raw.headers(), vec!["api", "oil"]);
    assert_eq!(raw.height(), 3);
    assert_eq!(
        raw.column_values("api"),
        Some(vec![
            Some("001".to_string()),
            Some("002".to_string()),
            Some("003".to_string())
        ])
    );
    assert_eq!(
        raw.column_values("oil"),
        Some(vec![None, Some(" 1,200 ".to_string()), None])
    );
}

#[test]
fn header_only_file_yields_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "a,b\n").unwrap();

    let raw = read_raw_csv(&path, &CsvReadOptions::default()).expect("read");
    assert_eq!(raw.headers(), vec!["a", "b"]);
    assert_eq!(raw.height(), 0);
}

#[test]
fn empty_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nothing.csv");
    fs::write(&path, "").unwrap();

    let err = read_raw_csv(&path, &CsvReadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::EmptyCsv { .. }));
}
