//! Raw tabular input at the loader boundary.
//!
//! The core consumes already-parsed tables of named-field rows; parsing a
//! spreadsheet file into this shape is the [`TableLoader`]'s job. A loader
//! fails with `UnreadableInput` only when the file cannot be turned into a
//! table at all; missing columns are the row normalizer's concern.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::RunSheetError;

/// One raw row: column name → raw cell text.
///
/// A column absent from the map was empty or missing in the source; the
/// normalizer maps that to `FieldValue::Unknown`. Present cells may hold
/// the empty string, which means "provided but blank".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// Zero-based position in the source table, kept for diagnostics.
    pub index: usize,
    cells: BTreeMap<String, String>,
}

impl RawRow {
    pub fn new(index: usize) -> Self {
        Self { index, cells: BTreeMap::new() }
    }

    /// Set a cell value. Chainable for test and loader construction.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

/// A fully materialized input table.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Header columns in source order (including columns that happen to be
    /// empty on every row).
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    pub fn push_row(&mut self, row: RawRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// External collaborator that parses a spreadsheet file into a table.
pub trait TableLoader {
    /// Load one file into an ordered sequence of named-field rows.
    ///
    /// # Errors
    /// Returns [`RunSheetError::UnreadableInput`] if the file cannot be
    /// parsed into a table at all.
    fn load(&self, path: &Path) -> Result<RawTable, RunSheetError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_cell_stays_absent() {
        let row = RawRow::new(0).with("Title", "Intro to X").with("Room", "");
        assert_eq!(row.get("Title"), Some("Intro to X"));
        assert_eq!(row.get("Room"), Some(""));
        assert_eq!(row.get("Day"), None);
    }
}
