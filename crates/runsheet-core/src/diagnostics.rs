//! Non-fatal anomalies surfaced alongside pipeline output.
//!
//! Diagnostics are data, not log lines: the pipeline returns them next to
//! its results so operators can review them and tests can assert on them.
//! None of them aborts a run on its own.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::fields::RowKind;

/// One recoverable anomaly observed during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A row was dropped because a required identifying column was absent.
    MissingRequiredField {
        kind: RowKind,
        field: String,
        /// Zero-based position in the source table.
        row_index: usize,
    },

    /// A provided value could not be parsed into its declared type. The
    /// row is dropped when the field is required, otherwise the value is
    /// treated as unknown.
    MalformedField {
        kind: RowKind,
        field: String,
        row_index: usize,
        value: String,
    },

    /// A schedule row matched no session and was excluded from output.
    OrphanScheduleEntry {
        row_index: usize,
        room: String,
        start: NaiveDateTime,
        title: String,
    },

    /// A session had no matching schedule row; it is kept in output with
    /// its own declared room/time so late changes stay visible.
    UnscheduledSession { session_id: String, title: String },

    /// A schedule row matched a session by title only. The schedule row's
    /// room and start were adopted; both sides are recorded for audit.
    TitleFallbackMatch {
        session_id: String,
        title: String,
        schedule_room: String,
        schedule_start: NaiveDateTime,
        session_room: Option<String>,
        session_start: Option<NaiveDateTime>,
    },

    /// A session matched no configured group and landed in the catch-all.
    UnassignedSession { session_id: String, title: String },

    /// The input table carried a column outside the declared field set.
    /// Reported once per column, so schema drift is visible instead of
    /// silently ignored.
    UnrecognizedField { kind: RowKind, column: String },
}

impl Diagnostic {
    /// Short machine-friendly tag, used in logs and counters.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::MissingRequiredField { .. } => "missing_required_field",
            Self::MalformedField { .. } => "malformed_field",
            Self::OrphanScheduleEntry { .. } => "orphan_schedule_entry",
            Self::UnscheduledSession { .. } => "unscheduled_session",
            Self::TitleFallbackMatch { .. } => "title_fallback_match",
            Self::UnassignedSession { .. } => "unassigned_session",
            Self::UnrecognizedField { .. } => "unrecognized_field",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequiredField { kind, field, row_index } => write!(
                f,
                "{} row {}: required field '{}' is missing; row dropped",
                kind.as_str(),
                row_index,
                field
            ),
            Self::MalformedField { kind, field, row_index, value } => write!(
                f,
                "{} row {}: could not parse '{}' value {:?}",
                kind.as_str(),
                row_index,
                field,
                value
            ),
            Self::OrphanScheduleEntry { row_index, room, start, title } => write!(
                f,
                "schedule row {} ({:?} in {} at {}) matched no session; excluded from output",
                row_index, title, room, start
            ),
            Self::UnscheduledSession { session_id, title } => write!(
                f,
                "session {} ({:?}) has no schedule row; kept with its declared slot",
                session_id, title
            ),
            Self::TitleFallbackMatch { session_id, title, schedule_room, schedule_start, .. } => {
                write!(
                    f,
                    "session {} ({:?}) matched by title only; adopted {} at {} from the schedule",
                    session_id, title, schedule_room, schedule_start
                )
            }
            Self::UnassignedSession { session_id, title } => write!(
                f,
                "session {} ({:?}) matched no group; placed in the catch-all",
                session_id, title
            ),
            Self::UnrecognizedField { kind, column } => write!(
                f,
                "{} table has undeclared column '{}'",
                kind.as_str(),
                column
            ),
        }
    }
}
