//! Non-negative check. Stops at the first offending column.

use rawload_model::ValidationError;
use rawload_transform::{ColumnKind, TypedTable, parse_numeric};

/// Whether any non-null value in `name` is below zero.
///
/// Text columns are read with the numeric cleaning rules; cells that do not
/// parse are skipped.
pub fn has_negative(table: &TypedTable, name: &str) -> bool {
    match table.kind(name) {
        Some(ColumnKind::Integer) => table
            .integers(name)
            .is_some_and(|values| values.into_iter().flatten().any(|v| v < 0)),
        Some(ColumnKind::Float) => table
            .floats(name)
            .is_some_and(|values| values.into_iter().flatten().any(|v| v < 0.0)),
        Some(ColumnKind::Text) => table.texts(name).is_some_and(|values| {
            values
                .iter()
                .flatten()
                .filter_map(|cell| parse_numeric(cell))
                .any(|number| number.is_negative())
        }),
        None => false,
    }
}

pub fn check(table: &TypedTable, columns: &[String]) -> Result<(), ValidationError> {
    match columns.iter().find(|name| has_negative(table, name)) {
        Some(column) => Err(ValidationError::NonNegativeViolation {
            column: column.clone(),
        }),
        None => Ok(()),
    }
}
