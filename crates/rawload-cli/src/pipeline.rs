//! Ingestion pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Load**: read the source CSV as text and resolve the contract against its headers
//! 2. **Normalize**: renames, whitespace stripping, upper-casing
//! 3. **Coerce**: numeric columns to nullable integer or float
//! 4. **Validate**: non-null, non-negative, key uniqueness
//! 5. **Deliver**: hand the table to a sink (skipped on dry runs)
//!
//! Each stage takes the output of the previous stage and returns typed results.
//! Any failure aborts the run before the sink is touched.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use rawload_ingest::{CsvReadOptions, IngestError, RawTable, read_raw_csv};
use rawload_model::{Contract, ValidationError};
use rawload_transform::normalization::{apply_normalize_plan, coerce_with_plan};
use rawload_transform::{ColumnKind, ExecutionPlan, PlanError, TransformError, TypedTable};
use rawload_validate::{Quarantine, ValidationOutcome, validate_with_plan};
use thiserror::Error;
use tracing::{info, info_span, warn};

use crate::sink::{SinkError, SinkReceipt, TableSink};

/// Default directory holding source files named by contracts.
pub const DEFAULT_DATA_DIR: &str = "data/raw";

/// Where a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Plan,
    Normalize,
    Coerce,
    Validate,
    Deliver,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load",
            Self::Plan => "plan",
            Self::Normalize => "normalize",
            Self::Coerce => "coerce",
            Self::Validate => "validate",
            Self::Deliver => "deliver",
        })
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("load failed: {0}")]
    Ingest(#[from] IngestError),

    #[error("plan failed: {0}")]
    Plan(#[from] PlanError),

    #[error("{stage} failed: {source}")]
    Transform {
        stage: Stage,
        #[source]
        source: TransformError,
    },

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("sink failed: {0}")]
    Sink(#[from] SinkError),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Ingest(_) => Stage::Load,
            Self::Plan(_) => Stage::Plan,
            Self::Transform { stage, .. } => *stage,
            Self::Validation(_) => Stage::Validate,
            Self::Sink(_) => Stage::Deliver,
        }
    }

    /// Process exit status: 2 for validation, 3 for the sink, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Sink(_) => 3,
            Self::Ingest(_) | Self::Plan(_) | Self::Transform { .. } => 1,
        }
    }
}

/// Source file for a contract: the override if given, else `<data_dir>/<source_file>`.
pub fn resolve_csv_path(contract: &Contract, csv: Option<&Path>, data_dir: &Path) -> PathBuf {
    match csv {
        Some(path) => path.to_path_buf(),
        None => data_dir.join(&contract.source_file),
    }
}

// ============================================================================
// Stage 1: Load
// ============================================================================

/// Raw text table plus the contract resolved against its headers.
#[derive(Debug)]
pub struct Loaded {
    pub raw: RawTable,
    pub plan: ExecutionPlan,
}

pub fn load(contract: &Contract, csv_path: &Path) -> Result<Loaded, PipelineError> {
    let options = CsvReadOptions::for_contract(contract);
    let raw = read_raw_csv(csv_path, &options)?;
    info!(
        path = %csv_path.display(),
        rows = raw.height(),
        columns = ?raw.headers(),
        "loaded raw CSV"
    );
    let plan = resolve_plan(contract, &raw)?;
    Ok(Loaded { raw, plan })
}

pub fn resolve_plan(contract: &Contract, raw: &RawTable) -> Result<ExecutionPlan, PlanError> {
    let plan = ExecutionPlan::resolve(contract, &raw.headers())?;
    for entry in &plan.unresolved {
        warn!(
            rule = ?entry.rule,
            column = %entry.column,
            "contract references a column missing from the input"
        );
    }
    Ok(plan)
}

// ============================================================================
// Stage 2: Normalize
// ============================================================================

#[derive(Debug)]
pub struct Normalized {
    pub raw: RawTable,
    pub plan: ExecutionPlan,
}

pub fn normalize(loaded: Loaded) -> Result<Normalized, PipelineError> {
    let Loaded { raw, plan } = loaded;
    let raw = apply_normalize_plan(raw, &plan.normalize).map_err(|source| {
        PipelineError::Transform {
            stage: Stage::Normalize,
            source,
        }
    })?;
    info!(columns = ?raw.headers(), "standardized columns");
    Ok(Normalized { raw, plan })
}

// ============================================================================
// Stage 3: Coerce
// ============================================================================

#[derive(Debug)]
pub struct Coerced {
    pub table: TypedTable,
    pub kinds: BTreeMap<String, ColumnKind>,
    pub plan: ExecutionPlan,
}

pub fn coerce(normalized: Normalized) -> Result<Coerced, PipelineError> {
    let Normalized { raw, plan } = normalized;
    let coerced = coerce_with_plan(raw, &plan.coerce).map_err(|source| {
        PipelineError::Transform {
            stage: Stage::Coerce,
            source,
        }
    })?;
    for (column, kind) in &coerced.kinds {
        info!(column = %column, kind = %kind, "numeric column");
    }
    Ok(Coerced {
        table: coerced.table,
        kinds: coerced.kinds,
        plan,
    })
}

// ============================================================================
// Stage 4: Validate
// ============================================================================

/// A table ready for the sink.
#[derive(Debug)]
pub struct Validated {
    pub table: TypedTable,
    pub kinds: BTreeMap<String, ColumnKind>,
    pub plan: ExecutionPlan,
    pub outcome: ValidationOutcome,
}

pub fn validate(
    coerced: Coerced,
    contract: &Contract,
    quarantine: Option<&Quarantine>,
) -> Result<Validated, PipelineError> {
    let Coerced { table, kinds, plan } = coerced;
    let outcome = validate_with_plan(&table, &plan.validate, &contract.raw_table, quarantine)?;
    info!(
        rows = table.height(),
        columns = table.width(),
        "validation passed"
    );
    Ok(Validated {
        table,
        kinds,
        plan,
        outcome,
    })
}

// ============================================================================
// Stage 5: Deliver
// ============================================================================

pub fn deliver(
    validated: &Validated,
    sink: &mut dyn TableSink,
    overwrite: bool,
) -> Result<SinkReceipt, PipelineError> {
    let table_name = validated.plan.table.as_str();
    let receipt = sink.write(table_name, &validated.table, overwrite)?;
    if !receipt.success {
        return Err(SinkError::Rejected {
            table: table_name.to_string(),
        }
        .into());
    }
    info!(
        table = %table_name,
        rows = receipt.rows_written,
        columns = validated.table.width(),
        "loaded table"
    );
    Ok(receipt)
}

// ============================================================================
// Full run
// ============================================================================

/// Inputs for one run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineInput<'a> {
    pub contract: &'a Contract,
    pub csv_path: &'a Path,
    pub quarantine: Option<&'a Quarantine>,
}

/// Load, normalize, coerce and validate. Never touches a sink.
pub fn run_pipeline(input: &PipelineInput<'_>) -> Result<Validated, PipelineError> {
    let span = info_span!("pipeline", table = %input.contract.target_table());
    let _guard = span.enter();

    let loaded = load(input.contract, input.csv_path)?;
    let normalized = normalize(loaded)?;
    let coerced = coerce(normalized)?;
    validate(coerced, input.contract, input.quarantine)
}

/// Run the pipeline, then deliver unless `dry_run`.
pub fn run_and_deliver(
    input: &PipelineInput<'_>,
    sink: &mut dyn TableSink,
    overwrite: bool,
    dry_run: bool,
) -> Result<(Validated, Option<SinkReceipt>), PipelineError> {
    let validated = run_pipeline(input)?;
    if dry_run {
        info!(table = %validated.plan.table, "dry run: skipping sink");
        return Ok((validated, None));
    }
    let receipt = deliver(&validated, sink, overwrite)?;
    Ok((validated, Some(receipt)))
}
