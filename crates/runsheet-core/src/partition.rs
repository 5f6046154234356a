//! Group partitioner: assigns canonical sessions to named output groups.
//!
//! Group definitions are declared configuration, evaluated in order; the
//! partition and sort algorithm lives here. Every session lands somewhere:
//! a session matching no declared group goes to the catch-all group with a
//! diagnostic, so no accepted talk ever drops out of all outputs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::resolve::CanonicalSession;

/// Membership rule for one group. All present clauses must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRule {
    /// Case-insensitive substring over the session's room.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_contains: Option<String>,
    /// Case-insensitive substring over the session's format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_contains: Option<String>,
}

impl GroupRule {
    pub fn is_empty(&self) -> bool {
        self.room_contains.is_none() && self.format_contains.is_none()
    }

    pub fn matches(&self, session: &CanonicalSession) -> bool {
        let room_ok = match &self.room_contains {
            Some(needle) => session
                .room_name()
                .is_some_and(|room| room.to_lowercase().contains(&needle.to_lowercase())),
            None => true,
        };
        let format_ok = match &self.format_contains {
            Some(needle) => session
                .format
                .known()
                .is_some_and(|format| format.to_lowercase().contains(&needle.to_lowercase())),
            None => true,
        };
        room_ok && format_ok
    }
}

/// A declared output group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDef {
    pub name: String,
    #[serde(flatten)]
    pub rule: GroupRule,
    /// When true, a matching session is claimed and later groups are not
    /// consulted for it.
    #[serde(default = "default_true")]
    pub exclusive: bool,
    /// Whether this group's detail view may carry private contact fields.
    #[serde(default)]
    pub detail_includes_private: bool,
}

fn default_true() -> bool {
    true
}

impl GroupDef {
    /// The implicit catch-all group appended after all declared groups.
    pub fn catch_all(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rule: GroupRule::default(),
            exclusive: true,
            detail_includes_private: false,
        }
    }
}

/// One group's resolved membership, in final view order.
#[derive(Debug, Clone)]
pub struct GroupMembers {
    pub def: GroupDef,
    pub sessions: Vec<CanonicalSession>,
}

/// Partition output: one member list per group (declared order, catch-all
/// last) plus diagnostics for catch-all placements.
#[derive(Debug)]
pub struct Partition {
    pub groups: Vec<GroupMembers>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Assign each session to its groups and sort every member list.
pub fn partition(
    sessions: &[CanonicalSession],
    groups: &[GroupDef],
    catch_all_name: &str,
) -> Partition {
    let mut members: Vec<Vec<CanonicalSession>> = vec![Vec::new(); groups.len()];
    let mut catch_all: Vec<CanonicalSession> = Vec::new();
    let mut diagnostics = Vec::new();

    for session in sessions {
        let mut assigned = false;
        for (idx, group) in groups.iter().enumerate() {
            if group.rule.matches(session) {
                members[idx].push(session.clone());
                assigned = true;
                if group.exclusive {
                    break;
                }
            }
        }
        if !assigned {
            catch_all.push(session.clone());
            // With no groups declared at all, the catch-all is the only
            // output and flagging every session would be noise.
            if !groups.is_empty() {
                diagnostics.push(Diagnostic::UnassignedSession {
                    session_id: session.session_id.clone(),
                    title: session.title.clone(),
                });
            }
        }
    }

    let mut out = Vec::with_capacity(groups.len() + 1);
    for (def, mut sessions) in groups.iter().cloned().zip(members) {
        sort_members(&mut sessions);
        out.push(GroupMembers { def, sessions });
    }
    sort_members(&mut catch_all);
    out.push(GroupMembers { def: GroupDef::catch_all(catch_all_name), sessions: catch_all });

    debug!(groups = out.len(), "partitioned sessions into groups");
    Partition { groups: out, diagnostics }
}

/// Group sort key: ascending (start time, room), untimed sessions last,
/// session id as the final tiebreak so the order is total.
fn sort_members(sessions: &mut [CanonicalSession]) {
    sessions.sort_by(|a, b| {
        let key = |s: &CanonicalSession| {
            (
                s.start.is_none(),
                s.start,
                s.room_name().unwrap_or_default().to_lowercase(),
                s.session_id.clone(),
            )
        };
        key(a).cmp(&key(b))
    });
}
