//! Fatal error types for the run sheet pipeline.
//!
//! Only failures that must abort a run live here; recoverable anomalies
//! are [`Diagnostic`](crate::diagnostics::Diagnostic) values returned
//! alongside results. Any fatal error aborts before output emission so a
//! partial workbook is never written.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

/// Top-level fatal error for the run sheet pipeline.
#[derive(Error, Debug)]
pub enum RunSheetError {
    /// Two distinct sessions resolved to the same room and start time.
    /// Publishing conflicting room assignments is worse than failing loudly.
    #[error(
        "scheduling conflict in {room} at {start}: session {first_id} ({first_title:?}) and \
         session {second_id} ({second_title:?}) both claim the slot"
    )]
    SchedulingConflict {
        room: String,
        start: NaiveDateTime,
        first_id: String,
        first_title: String,
        second_id: String,
        second_title: String,
    },

    /// The input file could not be parsed into a table at all.
    ///
    /// Raised at the table-loader boundary; missing columns are the row
    /// normalizer's concern, not this error's.
    #[error("unreadable input {path}: {message}")]
    UnreadableInput { path: PathBuf, message: String },

    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Workbook emission failed.
    #[error("workbook emission failed: {0}")]
    Emit(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse the configuration
    #[error("failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Invalid configuration value
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for RunSheetError
pub type Result<T, E = RunSheetError> = std::result::Result<T, E>;
