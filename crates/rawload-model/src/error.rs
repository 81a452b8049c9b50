//! Error taxonomy shared by the pipeline crates.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::sample::RowSample;

/// A contract that cannot drive a run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("contract is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid delimiter {0:?}: expected a single ASCII character")]
    InvalidDelimiter(String),
}

/// A hard validation failure. Always raised before any sink interaction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Every offending column with its null count.
    #[error("non-null columns contain nulls: {}", format_counts(.0))]
    NonNullViolation(BTreeMap<String, usize>),

    /// The first column found with a negative value.
    #[error("negative values found in column '{column}'")]
    NonNegativeViolation { column: String },

    /// Duplicate primary-key candidates with a bounded sample (key columns only).
    #[error(
        "duplicate PK candidates for [{}]: {duplicate_rows} duplicate rows. sample:\n{sample}",
        .columns.join(", ")
    )]
    DuplicateKeyViolation {
        columns: Vec<String>,
        duplicate_rows: usize,
        sample: RowSample,
    },
}

impl ValidationError {
    /// Short stable name for logs and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NonNullViolation(_) => "non_null",
            Self::NonNegativeViolation { .. } => "non_negative",
            Self::DuplicateKeyViolation { .. } => "duplicate_key",
        }
    }
}

fn format_counts(counts: &BTreeMap<String, usize>) -> String {
    let parts: Vec<String> = counts
        .iter()
        .map(|(column, count)| format!("{column}={count}"))
        .collect();
    format!("{{{}}}", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_null_message_lists_every_column() {
        let err = ValidationError::NonNullViolation(BTreeMap::from([
            ("A".to_string(), 1),
            ("B".to_string(), 3),
        ]));
        assert_eq!(
            err.to_string(),
            "non-null columns contain nulls: {A=1, B=3}"
        );
        assert_eq!(err.kind(), "non_null");
    }

    #[test]
    fn missing_field_display() {
        let err = ConfigError::MissingField("raw_table");
        assert_eq!(
            err.to_string(),
            "contract is missing required field `raw_table`"
        );
    }
}
