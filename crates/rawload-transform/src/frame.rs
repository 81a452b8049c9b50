//! Typed table representation.
//!
//! After coercion every column is exactly one of three kinds. The kind is a
//! property of the whole column; cells are either null or a value of that
//! kind, never a mix.

use std::fmt;

use polars::prelude::{DataFrame, DataType};
use serde::Serialize;

use crate::error::{Result, TransformError};

/// The closed set of column kinds a [`TypedTable`] may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Nullable string.
    Text,
    /// Nullable 64-bit integer.
    Integer,
    /// Nullable 64-bit float.
    Float,
}

impl ColumnKind {
    pub fn from_dtype(dtype: &DataType) -> Option<Self> {
        match dtype {
            DataType::String => Some(Self::Text),
            DataType::Int64 => Some(Self::Integer),
            DataType::Float64 => Some(Self::Float),
            _ => None,
        }
    }

    pub fn dtype(self) -> DataType {
        match self {
            Self::Text => DataType::String,
            Self::Integer => DataType::Int64,
            Self::Float => DataType::Float64,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "nullable-integer",
            Self::Float => "nullable-float",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table whose columns are all [`ColumnKind`]s.
///
/// Wraps a polars `DataFrame`; construction checks every dtype so
/// downstream code can match on [`ColumnKind`] without a fallback arm.
#[derive(Debug, Clone)]
pub struct TypedTable {
    data: DataFrame,
}

impl TypedTable {
    /// Wrap a frame, rejecting columns outside the supported kinds.
    pub fn new(data: DataFrame) -> Result<Self> {
        for column in data.get_columns() {
            if ColumnKind::from_dtype(column.dtype()).is_none() {
                return Err(TransformError::UnsupportedDtype {
                    column: column.name().to_string(),
                    dtype: column.dtype().to_string(),
                });
            }
        }
        Ok(Self { data })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.data
    }

    pub fn into_frame(self) -> DataFrame {
        self.data
    }

    /// Returns the number of records in the table.
    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.data.column(name).is_ok()
    }

    /// Kind of one column, `None` if absent.
    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        let column = self.data.column(name).ok()?;
        ColumnKind::from_dtype(column.dtype())
    }

    /// Every column with its kind, in table order.
    pub fn schema(&self) -> Vec<(String, ColumnKind)> {
        self.data
            .get_columns()
            .iter()
            .filter_map(|column| {
                ColumnKind::from_dtype(column.dtype()).map(|kind| (column.name().to_string(), kind))
            })
            .collect()
    }

    /// Null cells in a column (0 for an absent column).
    pub fn null_count(&self, name: &str) -> usize {
        self.data
            .column(name)
            .map(|column| column.null_count())
            .unwrap_or(0)
    }

    /// Cells of an integer column, `None` if absent or not integer.
    pub fn integers(&self, name: &str) -> Option<Vec<Option<i64>>> {
        let column = self.data.column(name).ok()?;
        Some(column.i64().ok()?.into_iter().collect())
    }

    /// Cells of a float column, `None` if absent or not float.
    pub fn floats(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let column = self.data.column(name).ok()?;
        Some(column.f64().ok()?.into_iter().collect())
    }

    /// Cells of a text column, `None` if absent or not text.
    pub fn texts(&self, name: &str) -> Option<Vec<Option<String>>> {
        let column = self.data.column(name).ok()?;
        Some(
            column
                .str()
                .ok()?
                .into_iter()
                .map(|cell| cell.map(str::to_string))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

    use super::*;

    fn frame(columns: Vec<Column>) -> DataFrame {
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn kinds_follow_dtypes() {
        let table = TypedTable::new(frame(vec![
            Series::new("name".into(), vec![Some("a"), None]).into_column(),
            Series::new("qty".into(), vec![Some(1i64), None]).into_column(),
            Series::new("rate".into(), vec![Some(1.5f64), Some(2.0)]).into_column(),
        ]))
        .unwrap();

        assert_eq!(
            table.schema(),
            vec![
                ("name".to_string(), ColumnKind::Text),
                ("qty".to_string(), ColumnKind::Integer),
                ("rate".to_string(), ColumnKind::Float),
            ]
        );
        assert_eq!(table.null_count("qty"), 1);
        assert_eq!(table.integers("qty"), Some(vec![Some(1), None]));
        assert_eq!(table.integers("rate"), None);
        assert_eq!(table.kind("missing"), None);
    }

    #[test]
    fn rejects_unsupported_dtypes() {
        let err = TypedTable::new(frame(vec![
            Series::new("flag".into(), vec![Some(true)]).into_column(),
        ]))
        .unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedDtype { column, .. } if column == "flag"));
    }

    #[test]
    fn kind_names() {
        assert_eq!(ColumnKind::Integer.to_string(), "nullable-integer");
        assert!(ColumnKind::Float.is_numeric());
        assert!(!ColumnKind::Text.is_numeric());
        assert_eq!(ColumnKind::Integer.dtype(), DataType::Int64);
    }
}
