//! Numeric coercion of text columns.
//!
//! Coercion runs in two steps. Every cell is cleaned and parsed on its own
//! (thousands separators dropped, blanks and junk become null). Then the
//! column as a whole picks one representation: nullable integer when every
//! parsed value is whole, nullable float otherwise. A parse failure is never
//! an error; it only shows up as a null.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use rawload_ingest::RawTable;
use tracing::debug;

use crate::error::Result;
use crate::frame::{ColumnKind, TypedTable};
use crate::plan::CoercePlan;

/// A single cleaned cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedNumber {
    Int(i64),
    Float(f64),
}

impl ParsedNumber {
    /// The value as an integer if it is whole and fits in `i64`.
    pub fn as_whole(self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(v),
            Self::Float(v) => float_to_whole(v),
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    pub fn is_negative(self) -> bool {
        match self {
            Self::Int(v) => v < 0,
            Self::Float(v) => v < 0.0,
        }
    }
}

/// Clean and parse one cell: trim, drop every `,`, then parse.
///
/// Returns `None` for empty text, unparseable text and non-finite values.
/// Infinities count as unparseable: `inf`, `-Infinity` and text that
/// overflows `f64` (such as `1e400`) all become null instead of turning the
/// column into a float column holding infinities.
pub fn parse_numeric(text: &str) -> Option<ParsedNumber> {
    let cleaned: String = text.trim().chars().filter(|ch| *ch != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(v) = cleaned.parse::<i64>() {
        return Some(ParsedNumber::Int(v));
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(ParsedNumber::Float(v)),
        _ => None,
    }
}

// 2^63 is exact in f64; everything strictly below it fits in i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn float_to_whole(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&v) {
        Some(v as i64)
    } else {
        None
    }
}

/// A coerced column in its single chosen representation.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericColumn {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
}

impl NumericColumn {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Integer(_) => ColumnKind::Integer,
            Self::Float(_) => ColumnKind::Float,
        }
    }

    pub fn null_count(&self) -> usize {
        match self {
            Self::Integer(values) => values.iter().filter(|v| v.is_none()).count(),
            Self::Float(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    fn into_column(self, name: &str) -> Column {
        match self {
            Self::Integer(values) => Series::new(name.into(), values).into_column(),
            Self::Float(values) => Series::new(name.into(), values).into_column(),
        }
    }
}

/// Parse a column of text cells and choose its representation.
///
/// An all-null column is integer.
pub fn coerce_values<'a>(cells: impl IntoIterator<Item = Option<&'a str>>) -> NumericColumn {
    let parsed: Vec<Option<ParsedNumber>> = cells
        .into_iter()
        .map(|cell| cell.and_then(parse_numeric))
        .collect();

    let whole: Option<Vec<Option<i64>>> = parsed
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(number) => number.as_whole().map(Some),
        })
        .collect();

    match whole {
        Some(values) => NumericColumn::Integer(values),
        None => NumericColumn::Float(
            parsed
                .into_iter()
                .map(|cell| cell.map(ParsedNumber::as_f64))
                .collect(),
        ),
    }
}

/// The typed table plus the kind chosen for each coerced column.
#[derive(Debug, Clone)]
pub struct Coerced {
    pub table: TypedTable,
    pub kinds: BTreeMap<String, ColumnKind>,
}

/// Coerce every present integer or numeric column; everything else stays text.
pub fn coerce(
    table: RawTable,
    integer_columns: &BTreeSet<String>,
    numeric_columns: &BTreeSet<String>,
) -> Result<Coerced> {
    let plan = CoercePlan::resolve(integer_columns, numeric_columns, &table.headers());
    coerce_with_plan(table, &plan)
}

/// Coerce the columns named by a resolved plan. Names the table lacks are skipped.
pub fn coerce_with_plan(table: RawTable, plan: &CoercePlan) -> Result<Coerced> {
    let frame = table.into_frame();
    let mut columns: Vec<Column> = Vec::with_capacity(frame.width());
    let mut kinds = BTreeMap::new();

    for column in frame.get_columns() {
        let name = column.name().to_string();
        if !plan.columns.contains(&name) {
            columns.push(column.clone());
            continue;
        }
        let text = column.str()?;
        let before = text.null_count();
        let numeric = coerce_values(text.into_iter());
        debug!(
            column = %name,
            kind = %numeric.kind(),
            unparsed = numeric.null_count().saturating_sub(before),
            "coerced column"
        );
        kinds.insert(name.clone(), numeric.kind());
        columns.push(numeric.into_column(&name));
    }

    let table = TypedTable::new(DataFrame::new(columns)?)?;
    Ok(Coerced { table, kinds })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells<'a>(values: &'a [Option<&'a str>]) -> impl Iterator<Item = Option<&'a str>> + 'a {
        values.iter().copied()
    }

    #[test]
    fn separators_blanks_and_junk() {
        let column = coerce_values(cells(&[
            Some("1,000"),
            Some(" 2.0 "),
            Some(""),
            Some("bad"),
        ]));
        assert_eq!(
            column,
            NumericColumn::Integer(vec![Some(1000), Some(2), None, None])
        );
    }

    #[test]
    fn fractional_value_widens_column_to_float() {
        let column = coerce_values(cells(&[Some("1.5"), Some("2")]));
        assert_eq!(column, NumericColumn::Float(vec![Some(1.5), Some(2.0)]));
    }

    #[test]
    fn all_null_column_is_integer() {
        let column = coerce_values(cells(&[None, None, None]));
        assert_eq!(column, NumericColumn::Integer(vec![None, None, None]));
        assert_eq!(column.null_count(), 3);
    }

    #[test]
    fn parse_rules() {
        assert_eq!(parse_numeric("-12"), Some(ParsedNumber::Int(-12)));
        assert_eq!(parse_numeric("+3"), Some(ParsedNumber::Int(3)));
        assert_eq!(parse_numeric("1e3"), Some(ParsedNumber::Float(1000.0)));
        assert_eq!(parse_numeric(" , "), None);
        assert_eq!(parse_numeric("inf"), None);
        assert_eq!(parse_numeric("NaN"), None);
        assert_eq!(parse_numeric("12abc"), None);
        assert_eq!(parse_numeric("-Infinity"), None);
        assert_eq!(parse_numeric("1e400"), None);
    }

    #[test]
    fn large_identifiers_keep_precision() {
        let column = coerce_values(cells(&[Some("9007199254740993")]));
        assert_eq!(
            column,
            NumericColumn::Integer(vec![Some(9_007_199_254_740_993)])
        );
    }

    #[test]
    fn whole_values_beyond_i64_are_float() {
        let column = coerce_values(cells(&[Some("1e19"), Some("1")]));
        assert_eq!(column.kind(), ColumnKind::Float);
    }

    #[test]
    fn coerce_only_touches_declared_present_columns() {
        let table = RawTable::from_columns(&[
            ("id", vec![Some("007"), Some("8")]),
            ("rate", vec![Some("0.5"), None]),
            ("note", vec![Some("12"), Some("x")]),
        ])
        .unwrap();
        let integers: BTreeSet<String> = ["id".to_string(), "missing".to_string()].into();
        let numerics: BTreeSet<String> = ["rate".to_string(), "id".to_string()].into();

        let coerced = coerce(table, &integers, &numerics).unwrap();
        assert_eq!(
            coerced.kinds,
            BTreeMap::from([
                ("id".to_string(), ColumnKind::Integer),
                ("rate".to_string(), ColumnKind::Float),
            ])
        );
        assert_eq!(coerced.table.integers("id"), Some(vec![Some(7), Some(8)]));
        assert_eq!(coerced.table.floats("rate"), Some(vec![Some(0.5), None]));
        assert_eq!(coerced.table.kind("note"), Some(ColumnKind::Text));
        assert_eq!(coerced.table.column_names(), vec!["id", "rate", "note"]);
    }
}
