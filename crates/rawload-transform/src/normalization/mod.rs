//! Normalization stages applied to a raw table.
//!
//! - **strings**: renames, whitespace stripping and upper-casing
//! - **numeric**: text to nullable integer or nullable float

pub mod numeric;
pub mod strings;

pub use numeric::{
    Coerced, NumericColumn, ParsedNumber, coerce, coerce_values, coerce_with_plan, parse_numeric,
};
pub use strings::{apply_normalize_plan, normalize};
