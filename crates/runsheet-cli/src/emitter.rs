//! Excel workbook emitter built on rust_xlsxwriter.
//!
//! One worksheet per view, in the order the pipeline produced them:
//! bold white-on-blue header row, thin borders, frozen header, fixed
//! column widths, and taller rows when a cell carries long wrapped text.
//! The workbook is assembled fully in memory and saved once, so a failed
//! run never leaves a partial file behind.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{DocProperties, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use runsheet_core::{RunSheetError, ViewTable, WorkbookEmitter};
use tracing::debug;

/// Header fill, from the conference brand palette.
const HEADER_BLUE: u32 = 0x2E648E;

/// Worksheet tab names are capped by the xlsx format.
const MAX_SHEET_NAME: usize = 31;

/// Cells longer than this get a taller row so wrapped text stays legible.
const LONG_TEXT_CHARS: usize = 100;

pub struct XlsxWorkbookEmitter {
    path: PathBuf,
    event_name: Option<String>,
}

impl XlsxWorkbookEmitter {
    pub fn new(path: &Path, event_name: Option<String>) -> Self {
        Self { path: path.to_path_buf(), event_name }
    }
}

impl WorkbookEmitter for XlsxWorkbookEmitter {
    fn emit(&mut self, views: &[ViewTable]) -> Result<(), RunSheetError> {
        let mut workbook = Workbook::new();
        if let Some(name) = &self.event_name {
            workbook.set_properties(&DocProperties::new().set_title(name.as_str()));
        }

        let formats = SheetFormats::new();
        for view in views {
            let worksheet = workbook.add_worksheet();
            write_view(worksheet, view, &formats).map_err(emit_err)?;
        }

        workbook.save(&self.path).map_err(emit_err)?;
        debug!(path = %self.path.display(), sheets = views.len(), "saved workbook");
        Ok(())
    }
}

fn emit_err(e: rust_xlsxwriter::XlsxError) -> RunSheetError {
    RunSheetError::Emit(e.to_string())
}

struct SheetFormats {
    header: Format,
    normal: Format,
    wrap: Format,
    time: Format,
    title: Format,
}

impl SheetFormats {
    fn new() -> Self {
        let header = Format::new()
            .set_bold()
            .set_background_color(HEADER_BLUE)
            .set_font_color(0xFFFFFF)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::Top)
            .set_text_wrap()
            .set_border(FormatBorder::Thin);
        let normal = Format::new()
            .set_align(FormatAlign::Top)
            .set_border(FormatBorder::Thin);
        let wrap = Format::new()
            .set_align(FormatAlign::Top)
            .set_text_wrap()
            .set_border(FormatBorder::Thin);
        let time = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::Top)
            .set_border(FormatBorder::Thin);
        let title = Format::new()
            .set_bold()
            .set_align(FormatAlign::Top)
            .set_border(FormatBorder::Thin);
        Self { header, normal, wrap, time, title }
    }

    fn for_column(&self, column: &str) -> &Format {
        match column {
            "Time" => &self.time,
            "Title" => &self.title,
            _ if wraps(column) => &self.wrap,
            _ => &self.normal,
        }
    }
}

/// Long-text columns that wrap instead of overflowing.
fn wraps(column: &str) -> bool {
    column == "Attendees Learn" || column.starts_with("Speaker Intro") || column == "Special Requests"
}

fn column_width(column: &str) -> f64 {
    match column {
        "Room" => 18.0,
        "Time" => 12.0,
        "Title" => 50.0,
        "Speakers" => 28.0,
        "Duration" => 10.0,
        "Attendees Learn" => 50.0,
        c if c.starts_with("Speaker Intro") => 50.0,
        "Special Requests" => 30.0,
        "Profile Photo" => 30.0,
        _ => 20.0,
    }
}

fn write_view(
    worksheet: &mut Worksheet,
    view: &ViewTable,
    formats: &SheetFormats,
) -> Result<(), rust_xlsxwriter::XlsxError> {
    worksheet.set_name(sheet_name(&view.name))?;

    for (col, column) in view.columns.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, column, &formats.header)?;
        worksheet.set_column_width(col, column_width(column))?;
    }
    worksheet.set_row_height(0, 30)?;

    for (row_idx, row) in view.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        let mut tall = false;
        for (col, cell) in row.iter().enumerate() {
            let column = view.columns[col].as_str();
            worksheet.write_string_with_format(row_num, col as u16, cell, formats.for_column(column))?;
            if wraps(column) && cell.len() > LONG_TEXT_CHARS {
                tall = true;
            }
        }
        if tall {
            worksheet.set_row_height(row_num, 80)?;
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    Ok(())
}

/// Truncate to the xlsx tab-name limit on a character boundary.
fn sheet_name(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME).collect()
}
