//! Individual validation checks.
//!
//! Each check looks at one rule and only at columns the plan resolved as
//! present.

pub mod non_negative;
pub mod non_null;
pub mod unique;

use rawload_ingest::cell_string;
use rawload_model::RowSample;
use rawload_transform::TypedTable;

/// Render the given rows of `columns` as a sample, stopping at `limit` rows.
pub(crate) fn sample_rows(
    table: &TypedTable,
    rows: &[usize],
    columns: &[String],
    limit: usize,
) -> RowSample {
    let frame = table.frame();
    let selected: Vec<_> = columns
        .iter()
        .filter_map(|name| frame.column(name).ok())
        .collect();
    let mut sample = RowSample::new(
        selected
            .iter()
            .map(|column| column.name().to_string())
            .collect(),
    );
    for &idx in rows.iter().take(limit) {
        sample.push_row(
            selected
                .iter()
                .map(|column| cell_string(column, idx))
                .collect(),
        );
    }
    sample
}
