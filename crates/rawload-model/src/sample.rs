//! Bounded row samples attached to validation evidence and quarantine files.

use std::fmt;

use serde::Serialize;

/// A small, rendered slice of a table: headers plus string-or-null cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowSample {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RowSample {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Option<String>>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column across the sample, if the column is present.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.headers.iter().position(|header| header == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).and_then(|cell| cell.as_deref()))
                .collect(),
        )
    }
}

impl fmt::Display for RowSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headers.join(" | "))?;
        for row in &self.rows {
            let cells: Vec<&str> = row
                .iter()
                .map(|cell| cell.as_deref().unwrap_or("<null>"))
                .collect();
            writeln!(f, "{}", cells.join(" | "))?;
        }
        Ok(())
    }
}
