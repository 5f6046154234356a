//! # Run Sheet Core Library
//!
//! Core business logic for the conference run sheet generator. It turns
//! two tabular exports from a talk-management platform (a schedule table
//! and a flattened sessions table) into named summary/detail view tables
//! ready for a workbook emitter.
//!
//! ## Architecture
//!
//! - **Row Normalizer**: raw rows → typed, trimmed canonical records,
//!   with declared required/optional field tables per row kind
//! - **Session Resolver**: joins the two tables on (room, start time)
//!   with a flagged title fallback, producing one record per talk
//! - **Group Partitioner**: assigns sessions to declared output groups
//!   with a catch-all so no accepted talk is ever dropped
//! - **View Projector**: renders each group as a public-safe summary
//!   view and a detail view with optional private contact fields
//!
//! The spreadsheet boundaries stay outside this crate: a [`TableLoader`]
//! supplies parsed tables and a [`WorkbookEmitter`] consumes the rendered
//! views. Everything in between is synchronous, deterministic, and free
//! of wall-clock or filesystem dependence.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fields;
pub mod normalize;
pub mod partition;
pub mod pipeline;
pub mod project;
pub mod resolve;
pub mod table;

pub use config::{EventConfig, OutputConfig, RunSheetConfig};
pub use diagnostics::Diagnostic;
pub use error::{ConfigError, Result, RunSheetError};
pub use fields::{AttrKey, FieldValue, RowKind};
pub use normalize::{normalize_schedule, normalize_sessions, ScheduleEntry, SessionEntry};
pub use partition::{partition, GroupDef, GroupMembers, GroupRule};
pub use pipeline::{build_run_sheets, RunSheetSet, WorkbookEmitter};
pub use project::{project, ProjectorOptions, ViewKind, ViewTable};
pub use resolve::{resolve, CanonicalSession};
pub use table::{RawRow, RawTable, TableLoader};
