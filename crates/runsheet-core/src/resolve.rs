//! Session resolver: reconciles the schedule and sessions tables into one
//! unified record per talk.
//!
//! The flattened sessions table is authoritative for which talks exist; a
//! `CanonicalSession` exists if and only if the talk appears there.
//! Schedule rows confirm slots: the primary match key is the exact
//! (room, start time) pair, with title equality as a flagged,
//! lower-confidence fallback. Schedule rows matching nothing become orphan
//! diagnostics; sessions matching nothing stay in output as unscheduled so
//! cancellations and late changes remain visible.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::diagnostics::Diagnostic;
use crate::error::RunSheetError;
use crate::fields::{AttrKey, FieldValue};
use crate::normalize::{ScheduleEntry, SessionEntry};

/// The unified per-talk record produced by resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSession {
    /// Authoritative identifier from the sessions table.
    pub session_id: String,
    pub title: String,
    pub room: FieldValue,
    pub start: Option<NaiveDateTime>,
    pub duration_minutes: Option<u32>,
    pub format: FieldValue,
    /// Speakers in source-row order, deduplicated.
    pub speakers: Vec<String>,
    /// Provided attributes only; an absent key means unknown.
    pub attrs: BTreeMap<AttrKey, String>,
    /// Whether a schedule row confirmed this session's slot.
    pub scheduled: bool,
}

impl CanonicalSession {
    /// The session's room when known and non-empty.
    pub fn room_name(&self) -> Option<&str> {
        self.room.known()
    }
}

/// Resolution output: unified sessions plus non-fatal diagnostics.
#[derive(Debug)]
pub struct Resolution {
    pub sessions: Vec<CanonicalSession>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Case- and whitespace-insensitive key for loose identifier matching.
fn norm(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Resolve the two normalized tables into canonical sessions.
///
/// # Errors
/// Returns [`RunSheetError::SchedulingConflict`] when two distinct
/// sessions end up claiming the same (room, start time) slot; publishing
/// conflicting room assignments must fail loudly.
pub fn resolve(
    schedule: &[ScheduleEntry],
    sessions: &[SessionEntry],
) -> Result<Resolution, RunSheetError> {
    let mut diagnostics = Vec::new();
    let mut canonical = merge_by_session_id(sessions);

    // Index sessions by declared slot and by normalized title.
    let mut by_slot: HashMap<(String, NaiveDateTime), Vec<usize>> = HashMap::new();
    let mut by_title: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, session) in canonical.iter().enumerate() {
        if let (Some(room), Some(start)) = (session.room_name(), session.start) {
            by_slot.entry((norm(room), start)).or_default().push(idx);
        }
        by_title.entry(norm(&session.title)).or_default().push(idx);
    }

    for entry in schedule {
        let slot_key = (norm(&entry.room), entry.start);
        if let Some(indices) = by_slot.get(&slot_key) {
            // Exact (room, start) match. Ambiguity here is a conflict, and
            // the final uniqueness pass below turns it into a hard error.
            for &idx in indices {
                canonical[idx].scheduled = true;
            }
            continue;
        }

        let title_key = norm(&entry.title);
        match by_title.get(&title_key).map(Vec::as_slice) {
            Some([idx]) => {
                let idx = *idx;
                let session = &mut canonical[idx];
                diagnostics.push(Diagnostic::TitleFallbackMatch {
                    session_id: session.session_id.clone(),
                    title: session.title.clone(),
                    schedule_room: entry.room.clone(),
                    schedule_start: entry.start,
                    session_room: session.room_name().map(str::to_string),
                    session_start: session.start,
                });
                // The schedule export is the operationally current document;
                // adopt its slot.
                session.room = FieldValue::Provided(entry.room.clone());
                session.start = Some(entry.start);
                session.scheduled = true;
            }
            // Zero candidates, or several sessions sharing the title: the
            // row cannot be attributed to one talk, so it is excluded.
            _ => {
                warn!(
                    row = entry.row_index,
                    title = %entry.title,
                    "schedule row matched no session"
                );
                diagnostics.push(Diagnostic::OrphanScheduleEntry {
                    row_index: entry.row_index,
                    room: entry.room.clone(),
                    start: entry.start,
                    title: entry.title.clone(),
                });
            }
        }
    }

    // Slot uniqueness is an output invariant: after adoption, no two
    // sessions may claim the same (room, start time).
    let mut claimed: HashMap<(String, NaiveDateTime), usize> = HashMap::new();
    for (idx, session) in canonical.iter().enumerate() {
        let (Some(room), Some(start)) = (session.room_name(), session.start) else {
            continue;
        };
        if let Some(&prev) = claimed.get(&(norm(room), start)) {
            let first = &canonical[prev];
            return Err(RunSheetError::SchedulingConflict {
                room: room.to_string(),
                start,
                first_id: first.session_id.clone(),
                first_title: first.title.clone(),
                second_id: session.session_id.clone(),
                second_title: session.title.clone(),
            });
        }
        claimed.insert((norm(room), start), idx);
    }

    for session in &canonical {
        if !session.scheduled {
            diagnostics.push(Diagnostic::UnscheduledSession {
                session_id: session.session_id.clone(),
                title: session.title.clone(),
            });
        }
    }

    info!(
        sessions = canonical.len(),
        diagnostics = diagnostics.len(),
        "resolved schedule against sessions table"
    );
    Ok(Resolution { sessions: canonical, diagnostics })
}

/// Collapse co-speaker rows (same session id) into one record per talk.
fn merge_by_session_id(entries: &[SessionEntry]) -> Vec<CanonicalSession> {
    let mut sessions: Vec<CanonicalSession> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        match index.get(&entry.session_id) {
            Some(&idx) => merge_entry(&mut sessions[idx], entry),
            None => {
                index.insert(entry.session_id.clone(), sessions.len());
                sessions.push(CanonicalSession {
                    session_id: entry.session_id.clone(),
                    title: entry.title.clone(),
                    room: entry.room.clone(),
                    start: entry.start,
                    duration_minutes: entry.duration_minutes,
                    format: entry.format.clone(),
                    speakers: vec![entry.speaker.clone()],
                    attrs: entry.attrs.clone(),
                    scheduled: false,
                });
            }
        }
    }
    sessions
}

/// Fold one co-speaker row into an existing session record.
fn merge_entry(session: &mut CanonicalSession, entry: &SessionEntry) {
    if !session.speakers.contains(&entry.speaker) {
        session.speakers.push(entry.speaker.clone());
    }
    if session.room.known().is_none() {
        if let Some(room) = entry.room.known() {
            session.room = FieldValue::Provided(room.to_string());
        }
    }
    if session.start.is_none() {
        session.start = entry.start;
    }
    if session.duration_minutes.is_none() {
        session.duration_minutes = entry.duration_minutes;
    }
    if session.format.known().is_none() {
        if let Some(format) = entry.format.known() {
            session.format = FieldValue::Provided(format.to_string());
        }
    }
    for (key, value) in &entry.attrs {
        match session.attrs.get_mut(key) {
            Some(existing) => {
                if key.is_speaker_scoped() {
                    merge_attr_text(existing, value);
                }
            }
            None => {
                session.attrs.insert(*key, value.clone());
            }
        }
    }
}

/// Join differing per-speaker values in source order, skipping duplicates.
fn merge_attr_text(existing: &mut String, new: &str) {
    if new.is_empty() || existing.split("; ").any(|part| part == new) {
        return;
    }
    if existing.is_empty() {
        new.clone_into(existing);
    } else {
        existing.push_str("; ");
        existing.push_str(new);
    }
}
