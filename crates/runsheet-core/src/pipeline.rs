//! The full run sheet pipeline: normalize → resolve → partition → project.
//!
//! One run reads both input tables fully, performs the stages in order and
//! produces every view once. Stages never interleave: the resolver's
//! conflict detection needs the complete session set before partitioning
//! begins. Any fatal error aborts before emission so a partial workbook is
//! never written.

use tracing::info;

use crate::config::RunSheetConfig;
use crate::diagnostics::Diagnostic;
use crate::error::RunSheetError;
use crate::normalize::{normalize_schedule, normalize_sessions};
use crate::partition::partition;
use crate::project::{project_pair, ViewTable};
use crate::resolve::{resolve, CanonicalSession};
use crate::table::RawTable;

/// Everything one run produces: the projected views in emission order,
/// the unified session set, and the consolidated diagnostic list.
#[derive(Debug)]
pub struct RunSheetSet {
    /// One summary/detail pair per group, declared order, catch-all last.
    pub views: Vec<ViewTable>,
    pub sessions: Vec<CanonicalSession>,
    pub diagnostics: Vec<Diagnostic>,
}

/// External collaborator that writes the projected views to an output
/// artifact. It owns visual formatting and file naming; the rows it
/// receives are fully rendered.
pub trait WorkbookEmitter {
    /// Write all views as one artifact.
    ///
    /// # Errors
    /// Returns [`RunSheetError::Emit`] (or an IO error) when the artifact
    /// cannot be produced; implementations must not leave partial output
    /// behind on failure.
    fn emit(&mut self, views: &[ViewTable]) -> Result<(), RunSheetError>;
}

/// Run the whole pipeline over two already-loaded tables.
///
/// Row-level failures are collected into the returned diagnostics rather
/// than thrown; the only fatal outcomes are a scheduling conflict or an
/// invalid configuration.
pub fn build_run_sheets(
    schedule: &RawTable,
    sessions: &RawTable,
    config: &RunSheetConfig,
) -> Result<RunSheetSet, RunSheetError> {
    config.validate()?;

    let mut diagnostics = Vec::new();

    let normalized_schedule = normalize_schedule(schedule);
    diagnostics.extend(normalized_schedule.diagnostics);
    let normalized_sessions = normalize_sessions(sessions);
    diagnostics.extend(normalized_sessions.diagnostics);

    let resolution = resolve(&normalized_schedule.entries, &normalized_sessions.entries)?;
    diagnostics.extend(resolution.diagnostics);

    let partitioned = partition(
        &resolution.sessions,
        &config.groups,
        &config.output.catch_all_group,
    );
    diagnostics.extend(partitioned.diagnostics);

    let opts = config.projector_options();
    let views: Vec<ViewTable> = partitioned
        .groups
        .iter()
        .flat_map(|group| project_pair(group, &opts))
        .collect();

    info!(
        views = views.len(),
        sessions = resolution.sessions.len(),
        diagnostics = diagnostics.len(),
        "run sheet pipeline complete"
    );
    Ok(RunSheetSet {
        views,
        sessions: resolution.sessions,
        diagnostics,
    })
}
