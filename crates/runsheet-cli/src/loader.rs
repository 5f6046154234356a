//! Spreadsheet table loader built on calamine.
//!
//! Reads the first worksheet of an export file, first row as the header.
//! Empty cells are omitted from a row's mapping so that "absent" survives
//! to the normalizer as `FieldValue::Unknown`; any calamine failure maps
//! to `UnreadableInput`. Missing columns are not this loader's concern.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use runsheet_core::{RawRow, RawTable, RunSheetError, TableLoader};
use tracing::debug;

pub struct XlsxTableLoader;

impl TableLoader for XlsxTableLoader {
    fn load(&self, path: &Path) -> Result<RawTable, RunSheetError> {
        let unreadable = |message: String| RunSheetError::UnreadableInput {
            path: path.to_path_buf(),
            message,
        };

        let mut workbook = open_workbook_auto(path).map_err(|e| unreadable(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| unreadable("workbook has no worksheets".to_string()))?
            .map_err(|e| unreadable(e.to_string()))?;

        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| unreadable("first worksheet is empty".to_string()))?;
        let columns: Vec<String> = header
            .iter()
            .map(|cell| cell_text(cell).unwrap_or_default().trim().to_string())
            .collect();

        let mut table = RawTable::new(columns.clone());
        for (index, cells) in rows.enumerate() {
            let mut row = RawRow::new(index);
            for (column, cell) in columns.iter().zip(cells) {
                if column.is_empty() {
                    continue;
                }
                if let Some(text) = cell_text(cell) {
                    row.set(column.clone(), text);
                }
            }
            table.push_row(row);
        }

        debug!(path = %path.display(), rows = table.len(), "loaded input table");
        Ok(table)
    }
}

/// Render one cell as text; `None` means the cell holds no value.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                Some(format!("{}", *f as i64))
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(if *b { "Yes" } else { "No" }.to_string()),
        Data::DateTime(dt) => Some(match dt.as_datetime() {
            Some(naive) => naive.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        }),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_unparsable_file_is_unreadable_input() {
        let mut file = tempfile::NamedTempFile::with_suffix(".xlsx").unwrap();
        file.write_all(b"this is not a spreadsheet").unwrap();

        let err = XlsxTableLoader.load(file.path()).unwrap_err();
        assert!(matches!(err, RunSheetError::UnreadableInput { .. }));
    }

    #[test]
    fn test_missing_file_is_unreadable_input() {
        let err = XlsxTableLoader
            .load(Path::new("/nonexistent/export.xlsx"))
            .unwrap_err();
        assert!(matches!(err, RunSheetError::UnreadableInput { .. }));
    }
}
