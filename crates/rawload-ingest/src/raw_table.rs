//! The raw, all-text table produced by the CSV reader.

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};

use crate::error::{IngestError, Result};

/// Ordered named columns where every cell is a string or null.
///
/// Backed by a polars `DataFrame` whose columns are all `String` dtype.
/// Nothing numeric has been inferred yet; that is the coercer's job.
#[derive(Debug, Clone)]
pub struct RawTable {
    data: DataFrame,
}

impl RawTable {
    /// Build a table from row-major cells. Short rows are padded with nulls.
    pub fn from_rows(headers: &[String], rows: &[Vec<Option<String>>]) -> Result<Self> {
        let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            let values: Vec<Option<&str>> = rows
                .iter()
                .map(|row| row.get(idx).and_then(|cell| cell.as_deref()))
                .collect();
            columns.push(Series::new(header.as_str().into(), values).into_column());
        }
        let data = DataFrame::new(columns)?;
        Ok(Self { data })
    }

    /// Build a table from column-major cells.
    pub fn from_columns(columns: &[(&str, Vec<Option<&str>>)]) -> Result<Self> {
        let columns: Vec<Column> = columns
            .iter()
            .map(|(name, values)| Series::new((*name).into(), values.as_slice()).into_column())
            .collect();
        let data = DataFrame::new(columns)?;
        Ok(Self { data })
    }

    /// Wrap an existing frame, checking every column is text.
    pub fn from_frame(data: DataFrame) -> Result<Self> {
        for column in data.get_columns() {
            if column.dtype() != &DataType::String {
                return Err(IngestError::NonTextColumn {
                    column: column.name().to_string(),
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

    /// Number of data rows.
    pub fn height(&self) -> usize {
        self.data.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.data.width()
    }

    /// Column names in table order.
    pub fn headers(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Owned cells of one column, or `None` if the column is absent.
    pub fn column_values(&self, name: &str) -> Option<Vec<Option<String>>> {
        let column = self.data.column(name).ok()?;
        let values = column.str().ok()?;
        Some(
            values
                .into_iter()
                .map(|cell| cell.map(str::to_string))
                .collect(),
        )
    }

    /// Count of null cells in a column (0 for an absent column).
    pub fn null_count(&self, name: &str) -> usize {
        self.data
            .column(name)
            .map(|column| column.null_count())
            .unwrap_or(0)
    }
}

impl PartialEq for RawTable {
    fn eq(&self, other: &Self) -> bool {
        self.headers() == other.headers()
            && self
                .headers()
                .iter()
                .all(|name| self.column_values(name) == other.column_values(name))
    }
}
