use std::path::PathBuf;

use rawload_cli::sink::SinkReceipt;
use rawload_transform::ColumnKind;
use rawload_validate::DuplicateReport;

#[derive(Debug)]
pub struct LoadResult {
    pub table_name: String,
    pub csv_path: PathBuf,
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
    pub duplicates: Option<DuplicateReport>,
    /// Sink file and receipt; `None` on a dry run.
    pub delivered: Option<(PathBuf, SinkReceipt)>,
}

#[derive(Debug)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub nulls: usize,
}

impl LoadResult {
    /// Rows the sink reported, `None` on a dry run.
    pub fn rows_delivered(&self) -> Option<usize> {
        self.delivered
            .as_ref()
            .map(|(_, receipt)| receipt.rows_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(delivered: Option<(PathBuf, SinkReceipt)>) -> LoadResult {
        LoadResult {
            table_name: "PROD".to_string(),
            csv_path: PathBuf::from("data/raw/prod.csv"),
            rows: 2,
            columns: vec![ColumnSummary {
                name: "qty".to_string(),
                kind: ColumnKind::Integer,
                nulls: 0,
            }],
            duplicates: None,
            delivered,
        }
    }

    #[test]
    fn dry_run_has_no_delivered_rows() {
        assert_eq!(result(None).rows_delivered(), None);
    }

    #[test]
    fn delivered_rows_come_from_the_sink_receipt() {
        let receipt = SinkReceipt {
            success: true,
            rows_written: 2,
        };
        let loaded = result(Some((PathBuf::from("warehouse/PROD.csv"), receipt)));
        assert_eq!(loaded.rows_delivered(), Some(2));
    }
}
