//! Error types for planning and transforming tables.

use rawload_ingest::IngestError;
use thiserror::Error;

/// Contract rules that cannot be applied to the input's schema.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanError {
    /// Two columns would share a name after renaming.
    #[error("column '{column}' would appear more than once after renaming")]
    DuplicateColumn { column: String },
}

/// Errors raised while normalizing or coercing a table.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// A plan resolved for a different column layout than the table has.
    #[error("plan covers {expected} columns but the table has {found}")]
    PlanMismatch { expected: usize, found: usize },

    /// A typed table column has a dtype outside the supported kinds.
    #[error("column '{column}' has unsupported dtype {dtype}")]
    UnsupportedDtype { column: String, dtype: String },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("DataFrame operation failed: {0}")]
    DataFrame(#[from] polars::prelude::PolarsError),
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
