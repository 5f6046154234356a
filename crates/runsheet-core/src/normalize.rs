//! Row normalizer: raw input rows → canonical typed records.
//!
//! Each raw row is checked against its row kind's declared field table,
//! trimmed, and parsed into typed fields. Rows missing a required
//! identifying field are dropped with a diagnostic; the run continues for
//! every resolvable row. Optional fields absent from the source become
//! `FieldValue::Unknown`, never an empty string.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::fields::{
    AttrKey, FieldTable, FieldValue, COL_DAY, COL_DURATION, COL_FORMAT, COL_OWNER, COL_ROOM,
    COL_SCHEDULED_AT, COL_SESSION_ID, COL_SPEAKERS, COL_START_TIME, COL_TITLE, SCHEDULE_FIELDS,
    SESSION_FIELDS,
};
use crate::table::{RawRow, RawTable};

/// Accepted timestamp formats for the sessions table's `Scheduled At`.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Accepted day formats for the schedule table.
const DAY_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Accepted time-of-day formats for the schedule table.
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M %p"];

/// A normalized schedule-table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub row_index: usize,
    pub room: String,
    pub start: NaiveDateTime,
    pub title: String,
    /// Split from the free-text speaker list, source order preserved.
    pub speakers: Vec<String>,
}

/// A normalized sessions-table row.
///
/// The flattened export repeats a session once per speaker, so one talk
/// may produce several of these; the resolver merges them by session id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub row_index: usize,
    pub session_id: String,
    pub title: String,
    pub speaker: String,
    pub room: FieldValue,
    pub start: Option<NaiveDateTime>,
    pub duration_minutes: Option<u32>,
    pub format: FieldValue,
    /// Provided attributes only; an absent key means unknown.
    pub attrs: BTreeMap<AttrKey, String>,
}

/// Output of normalizing one table: the surviving entries plus the
/// diagnostics for dropped rows and undeclared columns.
#[derive(Debug)]
pub struct Normalized<T> {
    pub entries: Vec<T>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Self { entries: Vec::new(), diagnostics: Vec::new() }
    }
}

/// Normalize the schedule table.
pub fn normalize_schedule(table: &RawTable) -> Normalized<ScheduleEntry> {
    let mut out = Normalized::default();
    check_columns(table, &SCHEDULE_FIELDS, &mut out.diagnostics);

    for row in &table.rows {
        let mut fields = RowFields::new(&SCHEDULE_FIELDS, row, &mut out.diagnostics);

        let room = fields.required(COL_ROOM);
        let title = fields.required(COL_TITLE);
        let day = fields.required_parsed(COL_DAY, parse_day);
        let time = fields.required_parsed(COL_START_TIME, parse_time);
        let speakers = fields.optional(COL_SPEAKERS);

        let (Some(room), Some(title), Some(day), Some(time)) = (room, title, day, time) else {
            continue;
        };
        out.entries.push(ScheduleEntry {
            row_index: row.index,
            room,
            start: day.and_time(time),
            title,
            speakers: split_speakers(speakers.known().unwrap_or_default()),
        });
    }
    debug!(
        rows = table.len(),
        entries = out.entries.len(),
        "normalized schedule table"
    );
    out
}

/// Normalize the flattened sessions table.
pub fn normalize_sessions(table: &RawTable) -> Normalized<SessionEntry> {
    let mut out = Normalized::default();
    check_columns(table, &SESSION_FIELDS, &mut out.diagnostics);

    for row in &table.rows {
        let mut fields = RowFields::new(&SESSION_FIELDS, row, &mut out.diagnostics);

        let session_id = fields.required(COL_SESSION_ID);
        let title = fields.required(COL_TITLE);
        let speaker = fields.required(COL_OWNER);
        let room = fields.optional(COL_ROOM);
        let start = fields.optional_parsed(COL_SCHEDULED_AT, parse_datetime);
        let duration = fields.optional_parsed(COL_DURATION, parse_minutes);
        let format = fields.optional(COL_FORMAT);

        let (Some(session_id), Some(title), Some(speaker)) = (session_id, title, speaker) else {
            continue;
        };

        // The export encodes the format as e.g. "30 minute talk"; recover
        // the duration from it when the duration column is absent.
        let duration_minutes =
            duration.or_else(|| format.known().and_then(|f| parse_minutes(f).ok()));

        let mut attrs = BTreeMap::new();
        for key in AttrKey::ALL {
            if let Some(value) = row.get(key.column()) {
                attrs.insert(key, value.trim().to_string());
            }
        }

        out.entries.push(SessionEntry {
            row_index: row.index,
            session_id,
            title,
            speaker,
            room,
            start,
            duration_minutes,
            format,
            attrs,
        });
    }
    debug!(
        rows = table.len(),
        entries = out.entries.len(),
        "normalized sessions table"
    );
    out
}

/// Per-row field accessor that records diagnostics as it goes.
struct RowFields<'a> {
    table: &'a FieldTable,
    row: &'a RawRow,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> RowFields<'a> {
    fn new(table: &'a FieldTable, row: &'a RawRow, diagnostics: &'a mut Vec<Diagnostic>) -> Self {
        Self { table, row, diagnostics }
    }

    /// A required text field; `None` (plus a diagnostic) when absent or blank.
    fn required(&mut self, column: &str) -> Option<String> {
        match FieldValue::from_cell(self.row.get(column)).known() {
            Some(value) => Some(value.to_string()),
            None => {
                self.diagnostics.push(Diagnostic::MissingRequiredField {
                    kind: self.table.kind,
                    field: column.to_string(),
                    row_index: self.row.index,
                });
                None
            }
        }
    }

    /// A required field parsed into a typed value; parse failures drop the
    /// row with a `MalformedField` diagnostic.
    fn required_parsed<T>(
        &mut self,
        column: &str,
        parse: impl Fn(&str) -> Result<T, ()>,
    ) -> Option<T> {
        let raw = self.required(column)?;
        match parse(&raw) {
            Ok(value) => Some(value),
            Err(()) => {
                self.diagnostics.push(Diagnostic::MalformedField {
                    kind: self.table.kind,
                    field: column.to_string(),
                    row_index: self.row.index,
                    value: raw,
                });
                None
            }
        }
    }

    /// An optional text field; absence maps to `Unknown`.
    fn optional(&mut self, column: &str) -> FieldValue {
        FieldValue::from_cell(self.row.get(column))
    }

    /// An optional typed field; parse failures degrade to unknown with a
    /// `MalformedField` diagnostic.
    fn optional_parsed<T>(
        &mut self,
        column: &str,
        parse: impl Fn(&str) -> Result<T, ()>,
    ) -> Option<T> {
        let raw = self.optional(column);
        let value = raw.known()?;
        match parse(value) {
            Ok(parsed) => Some(parsed),
            Err(()) => {
                self.diagnostics.push(Diagnostic::MalformedField {
                    kind: self.table.kind,
                    field: column.to_string(),
                    row_index: self.row.index,
                    value: value.to_string(),
                });
                None
            }
        }
    }
}

/// Report undeclared columns once per column, in source header order.
fn check_columns(table: &RawTable, fields: &FieldTable, diagnostics: &mut Vec<Diagnostic>) {
    for column in &table.columns {
        if !column.is_empty() && !fields.is_declared(column) {
            diagnostics.push(Diagnostic::UnrecognizedField {
                kind: fields.kind,
                column: column.clone(),
            });
        }
    }
}

/// Split a free-text speaker list on `;` or `,`, dropping empty entries
/// and preserving source order.
pub fn split_speakers(raw: &str) -> Vec<String> {
    raw.split([';', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime, ()> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or(())
}

fn parse_day(s: &str) -> Result<NaiveDate, ()> {
    DAY_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or(())
}

fn parse_time(s: &str) -> Result<NaiveTime, ()> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
        .ok_or(())
}

/// Parse a minute count from a bare number or the leading digits of a
/// longer value ("30", "30 minutes", "90 minute workshop").
fn parse_minutes(s: &str) -> Result<u32, ()> {
    let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().map_err(|_| ())
}
