//! Validation of a typed table before it is handed to a sink.
//!
//! Checks run in a fixed order and stop at the first hard failure:
//!
//! 1. **non-null**: exhaustive, reports every offending column
//! 2. **non-negative**: bails at the first offending column
//! 3. **uniqueness** of the primary-key candidate: fails in strict mode,
//!    otherwise quarantines a sample and lets the run continue
//!
//! # Example
//!
//! ```ignore
//! let outcome = validate(&ValidationInput {
//!     table: &typed,
//!     rules: &contract.validations,
//!     pk_candidate: &contract.pk_candidate,
//!     raw_table: &contract.raw_table,
//!     quarantine: Some(&Quarantine::default()),
//! })?;
//! ```

pub mod checks;
mod quarantine;

use std::path::PathBuf;

use rawload_model::{RowSample, ValidationError, ValidationRules};
use rawload_transform::TypedTable;
use rawload_transform::plan::ValidationPlan;
use serde::Serialize;
use tracing::{info, warn};

pub use quarantine::{DEFAULT_QUARANTINE_DIR, Quarantine, QuarantineError};

/// Rows shown when strict uniqueness fails (key columns only).
pub const HARD_SAMPLE_ROWS: usize = 5;
/// Rows written to the quarantine file (all columns).
pub const SOFT_SAMPLE_ROWS: usize = 200;

/// Everything the validator needs for one table.
#[derive(Debug, Clone, Copy)]
pub struct ValidationInput<'a> {
    pub table: &'a TypedTable,
    pub rules: &'a ValidationRules,
    pub pk_candidate: &'a [String],
    /// Contract table name, used for the quarantine file name.
    pub raw_table: &'a str,
    /// `None` skips the quarantine write; the duplicate report is still returned.
    pub quarantine: Option<&'a Quarantine>,
}

/// Duplicate primary-key candidates tolerated in soft mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateReport {
    pub key: Vec<String>,
    pub duplicate_rows: usize,
    pub sample: RowSample,
    /// Quarantine file, if it was written.
    pub path: Option<PathBuf>,
}

/// A table that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Ready {
        duplicates: Option<DuplicateReport>,
    },
}

impl ValidationOutcome {
    pub fn duplicates(&self) -> Option<&DuplicateReport> {
        match self {
            Self::Ready { duplicates } => duplicates.as_ref(),
        }
    }
}

/// Resolve the rules against the table's columns, then validate.
pub fn validate(input: &ValidationInput<'_>) -> Result<ValidationOutcome, ValidationError> {
    let plan = ValidationPlan::resolve(
        input.rules,
        input.pk_candidate,
        &input.table.column_names(),
    );
    validate_with_plan(input.table, &plan, input.raw_table, input.quarantine)
}

/// Validate against an already resolved plan.
pub fn validate_with_plan(
    table: &TypedTable,
    plan: &ValidationPlan,
    raw_table: &str,
    quarantine: Option<&Quarantine>,
) -> Result<ValidationOutcome, ValidationError> {
    checks::non_null::check(table, &plan.non_null)?;
    checks::non_negative::check(table, &plan.non_negative)?;

    if plan.key.is_empty() {
        return Ok(ValidationOutcome::Ready { duplicates: None });
    }
    let rows = checks::unique::duplicate_rows(table, &plan.key);
    if rows.is_empty() {
        info!(key = ?plan.key, "primary-key candidate is unique");
        return Ok(ValidationOutcome::Ready { duplicates: None });
    }

    if plan.enforce_unique {
        return Err(ValidationError::DuplicateKeyViolation {
            columns: plan.key.clone(),
            duplicate_rows: rows.len(),
            sample: checks::sample_rows(table, &rows, &plan.key, HARD_SAMPLE_ROWS),
        });
    }

    let sample = checks::sample_rows(table, &rows, &table.column_names(), SOFT_SAMPLE_ROWS);
    let path = quarantine.and_then(|quarantine| match quarantine.write(raw_table, &sample) {
        Ok(path) => Some(path),
        Err(error) => {
            warn!(%error, "could not write duplicate sample");
            None
        }
    });
    warn!(
        key = ?plan.key,
        duplicate_rows = rows.len(),
        sample = ?path,
        "duplicate primary-key candidates; continuing"
    );
    Ok(ValidationOutcome::Ready {
        duplicates: Some(DuplicateReport {
            key: plan.key.clone(),
            duplicate_rows: rows.len(),
            sample,
            path,
        }),
    })
}
