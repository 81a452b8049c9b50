//! Primary-key candidate uniqueness.

use std::collections::HashMap;

use polars::prelude::Column;
use rawload_ingest::cell_string;
use rawload_transform::TypedTable;

/// Indices of every row whose key tuple occurs more than once, in row order.
///
/// Null key cells compare equal to each other.
pub fn duplicate_rows(table: &TypedTable, key: &[String]) -> Vec<usize> {
    let frame = table.frame();
    let columns: Vec<&Column> = key
        .iter()
        .filter_map(|name| frame.column(name).ok())
        .collect();
    if columns.is_empty() {
        return Vec::new();
    }

    let keys: Vec<Vec<Option<String>>> = (0..table.height())
        .map(|idx| {
            columns
                .iter()
                .map(|column| cell_string(column, idx))
                .collect()
        })
        .collect();
    let mut counts: HashMap<&[Option<String>], usize> = HashMap::new();
    for row in &keys {
        *counts.entry(row.as_slice()).or_default() += 1;
    }

    keys.iter()
        .enumerate()
        .filter(|(_, row)| counts.get(row.as_slice()).copied().unwrap_or(0) > 1)
        .map(|(idx, _)| idx)
        .collect()
}
