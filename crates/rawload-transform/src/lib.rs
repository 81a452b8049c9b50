//! Contract-driven transformation for rawload.
//!
//! - **plan**: contract rules resolved against the input headers
//! - **normalization**: string normalization and numeric coercion
//! - **frame**: the typed table produced by coercion

mod error;
pub mod frame;
pub mod normalization;
pub mod plan;

pub use error::{PlanError, Result, TransformError};
pub use frame::{ColumnKind, TypedTable};
pub use normalization::{Coerced, coerce, coerce_with_plan, normalize, parse_numeric};
pub use plan::{ExecutionPlan, RuleKind, UnresolvedColumn};
