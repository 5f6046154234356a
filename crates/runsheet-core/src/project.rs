//! View projector: turns one group's member list into presentation-ready
//! summary and detail tables.
//!
//! Summary views carry the fixed public-safe field set (room, time, title,
//! speakers, duration) and never include any attribute flagged private.
//! Detail views add the declared presentation attributes, and contact
//! fields only when the group's detail view is explicitly marked as
//! containing private data. Row order always equals the group's sort key;
//! run sheets are read top to bottom as a live timeline.

use serde::{Deserialize, Serialize};

use crate::fields::AttrKey;
use crate::partition::GroupMembers;
use crate::resolve::CanonicalSession;

/// Rendered placeholder for unknown or blank values.
pub const BLANK: &str = "";

/// The two view shapes each group is projected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Summary,
    Detail,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Detail => "detail",
        }
    }
}

/// Summary column headers, in view order.
pub const SUMMARY_COLUMNS: &[&str] = &["Room", "Time", "Title", "Speakers", "Duration"];

/// One named, fully rendered view table, ready for the workbook emitter.
/// Cells are plain strings with no remaining format concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewTable {
    /// `summary_<group>` or `detail_<group>`.
    pub name: String,
    pub group: String,
    pub kind: ViewKind,
    /// True only for detail views marked as carrying contact fields.
    pub includes_private: bool,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Rendering options fed from configuration.
#[derive(Debug, Clone)]
pub struct ProjectorOptions {
    /// Room label for sessions with no assigned room, so floor staff can
    /// tell "unassigned on purpose" from a data gap.
    pub alternate_room_label: String,
}

impl Default for ProjectorOptions {
    fn default() -> Self {
        Self { alternate_room_label: "Any room".to_string() }
    }
}

/// Project one group into one view shape.
pub fn project(group: &GroupMembers, kind: ViewKind, opts: &ProjectorOptions) -> ViewTable {
    let includes_private = kind == ViewKind::Detail && group.def.detail_includes_private;
    let attrs = detail_attrs(includes_private);

    let columns: Vec<String> = match kind {
        ViewKind::Summary => SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect(),
        ViewKind::Detail => SUMMARY_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(attrs.iter().map(|a| a.label().to_string()))
            .collect(),
    };

    let rows = group
        .sessions
        .iter()
        .map(|session| {
            let mut row = base_cells(session, opts);
            if kind == ViewKind::Detail {
                for key in &attrs {
                    row.push(session.attrs.get(key).cloned().unwrap_or_else(|| BLANK.to_string()));
                }
            }
            row
        })
        .collect();

    ViewTable {
        name: format!("{}_{}", kind.as_str(), group.def.name),
        group: group.def.name.clone(),
        kind,
        includes_private,
        columns,
        rows,
    }
}

/// Project one group into its summary/detail pair, summary first.
pub fn project_pair(group: &GroupMembers, opts: &ProjectorOptions) -> [ViewTable; 2] {
    [
        project(group, ViewKind::Summary, opts),
        project(group, ViewKind::Detail, opts),
    ]
}

/// Detail attribute order: declared presentation order, private contact
/// fields last and only when the view is marked for them.
fn detail_attrs(includes_private: bool) -> Vec<AttrKey> {
    AttrKey::ALL
        .into_iter()
        .filter(|key| includes_private || !key.is_private())
        .collect()
}

fn base_cells(session: &CanonicalSession, opts: &ProjectorOptions) -> Vec<String> {
    vec![
        session
            .room_name()
            .map(str::to_string)
            .unwrap_or_else(|| opts.alternate_room_label.clone()),
        session
            .start
            .map(|start| start.format("%I:%M %p").to_string())
            .unwrap_or_else(|| BLANK.to_string()),
        session.title.clone(),
        session.speakers.join(", "),
        session
            .duration_minutes
            .map(|m| m.to_string())
            .unwrap_or_else(|| BLANK.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldValue;
    use crate::partition::{GroupDef, GroupRule};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn member(detail_includes_private: bool) -> GroupMembers {
        let mut attrs = BTreeMap::new();
        attrs.insert(AttrKey::Pronouns, "she/her".to_string());
        attrs.insert(AttrKey::MobilePhone, "+1 555 0100".to_string());
        let session = CanonicalSession {
            session_id: "42".to_string(),
            title: "Intro to X".to_string(),
            room: FieldValue::Provided("Room A".to_string()),
            start: NaiveDate::from_ymd_opt(2026, 10, 17)
                .unwrap()
                .and_hms_opt(10, 0, 0),
            duration_minutes: Some(30),
            format: FieldValue::Provided("30 minute talk".to_string()),
            speakers: vec!["J. Doe".to_string(), "A. Poe".to_string()],
            attrs,
            scheduled: true,
        };
        GroupMembers {
            def: GroupDef {
                name: "track-a".to_string(),
                rule: GroupRule::default(),
                exclusive: true,
                detail_includes_private,
            },
            sessions: vec![session],
        }
    }

    #[test]
    fn test_summary_has_fixed_public_columns() {
        let view = project(&member(true), ViewKind::Summary, &ProjectorOptions::default());
        assert_eq!(view.name, "summary_track-a");
        assert_eq!(view.columns, SUMMARY_COLUMNS);
        assert!(!view.includes_private);
        assert_eq!(
            view.rows[0],
            vec!["Room A", "10:00 AM", "Intro to X", "J. Doe, A. Poe", "30"]
        );
    }

    #[test]
    fn test_summary_never_carries_private_values() {
        let view = project(&member(true), ViewKind::Summary, &ProjectorOptions::default());
        for row in &view.rows {
            assert!(!row.iter().any(|cell| cell.contains("555")));
        }
    }

    #[test]
    fn test_detail_includes_attrs_and_blank_placeholders() {
        let view = project(&member(false), ViewKind::Detail, &ProjectorOptions::default());
        assert_eq!(view.name, "detail_track-a");
        let pronouns_idx = view.columns.iter().position(|c| c == "Pronouns").unwrap();
        assert_eq!(view.rows[0][pronouns_idx], "she/her");
        let intro_idx = view.columns.iter().position(|c| c == "Speaker Intro #1").unwrap();
        assert_eq!(view.rows[0][intro_idx], BLANK);
    }

    #[test]
    fn test_contact_columns_require_explicit_private_marking() {
        let unmarked = project(&member(false), ViewKind::Detail, &ProjectorOptions::default());
        assert!(!unmarked.includes_private);
        assert!(!unmarked.columns.iter().any(|c| c.contains("NOT PUBLIC")));

        let marked = project(&member(true), ViewKind::Detail, &ProjectorOptions::default());
        assert!(marked.includes_private);
        let phone_idx = marked
            .columns
            .iter()
            .position(|c| c == "Mobile # (NOT PUBLIC)")
            .unwrap();
        assert_eq!(marked.rows[0][phone_idx], "+1 555 0100");
    }

    #[test]
    fn test_roomless_session_renders_alternate_label() {
        let mut group = member(false);
        group.sessions[0].room = FieldValue::Unknown;
        group.sessions[0].start = None;
        let view = project(&group, ViewKind::Summary, &ProjectorOptions::default());
        assert_eq!(view.rows[0][0], "Any room");
        assert_eq!(view.rows[0][1], BLANK);
    }
}
