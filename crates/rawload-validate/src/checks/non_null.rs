//! Non-null check. Exhaustive: every offending column is reported.

use std::collections::BTreeMap;

use rawload_model::ValidationError;
use rawload_transform::TypedTable;

/// Null counts for every listed column that has at least one null.
pub fn null_counts(table: &TypedTable, columns: &[String]) -> BTreeMap<String, usize> {
    columns
        .iter()
        .map(|name| (name.clone(), table.null_count(name)))
        .filter(|(_, count)| *count > 0)
        .collect()
}

pub fn check(table: &TypedTable, columns: &[String]) -> Result<(), ValidationError> {
    let offending = null_counts(table, columns);
    if offending.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::NonNullViolation(offending))
    }
}
