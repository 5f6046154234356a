//! Field reference for the two input row kinds.
//!
//! Everything the pipeline knows about the export schemas lives here:
//! - which columns each row kind requires and which are optional,
//! - the closed registry of speaker/session attributes carried into
//!   detail views, with their source columns and privacy flags,
//! - the [`FieldValue`] sentinel that keeps "absent" distinct from
//!   "provided but blank".
//!
//! The normalizer consumes these tables uniformly; nothing else in the
//! pipeline reads raw column names.

use serde::{Deserialize, Serialize};

/// Which input table a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Schedule,
    Session,
}

impl RowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schedule => "schedule",
            Self::Session => "session",
        }
    }
}

/// A field value as the pipeline sees it.
///
/// `Unknown` means the column was absent from the source row. `Provided`
/// carries whatever the cell held, which may be the empty string; the two
/// states must never collapse into each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    #[default]
    Unknown,
    Provided(String),
}

impl FieldValue {
    /// Build from an optional raw cell, trimming whitespace.
    pub fn from_cell(cell: Option<&str>) -> Self {
        match cell {
            Some(raw) => Self::Provided(raw.trim().to_string()),
            None => Self::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// The provided value, if any (may be empty).
    pub fn provided(&self) -> Option<&str> {
        match self {
            Self::Provided(s) => Some(s),
            Self::Unknown => None,
        }
    }

    /// The provided value when it is non-empty.
    pub fn known(&self) -> Option<&str> {
        self.provided().filter(|s| !s.is_empty())
    }
}

/// Schedule table columns.
pub const COL_DAY: &str = "Day";
pub const COL_START_TIME: &str = "Start Time";
pub const COL_ROOM: &str = "Room";
pub const COL_TITLE: &str = "Title";
pub const COL_SPEAKERS: &str = "Speakers";

/// Sessions table columns (beyond the attribute registry).
pub const COL_SESSION_ID: &str = "Session Id";
pub const COL_OWNER: &str = "Owner";
pub const COL_SCHEDULED_AT: &str = "Scheduled At";
pub const COL_DURATION: &str = "Scheduled Duration";
pub const COL_FORMAT: &str = "Session format";

/// Declared required/optional column table for one row kind.
#[derive(Debug, Clone, Copy)]
pub struct FieldTable {
    pub kind: RowKind,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

pub const SCHEDULE_FIELDS: FieldTable = FieldTable {
    kind: RowKind::Schedule,
    required: &[COL_DAY, COL_START_TIME, COL_ROOM, COL_TITLE],
    optional: &[COL_SPEAKERS],
};

pub const SESSION_FIELDS: FieldTable = FieldTable {
    kind: RowKind::Session,
    required: &[COL_SESSION_ID, COL_TITLE, COL_OWNER],
    optional: &[COL_ROOM, COL_SCHEDULED_AT, COL_DURATION, COL_FORMAT],
};

impl FieldTable {
    /// Whether a source column belongs to this row kind's declared set.
    ///
    /// For session rows the attribute registry counts as declared; anything
    /// else in the input is schema drift and gets an `UnrecognizedField`
    /// diagnostic.
    pub fn is_declared(&self, column: &str) -> bool {
        if self.required.iter().any(|c| *c == column) || self.optional.iter().any(|c| *c == column)
        {
            return true;
        }
        match self.kind {
            RowKind::Schedule => false,
            RowKind::Session => AttrKey::from_column(column).is_some(),
        }
    }
}

/// The closed set of speaker/session attributes carried into detail views.
///
/// Listed in presentation order; private attributes only ever appear in
/// detail views explicitly marked as containing private data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrKey {
    AttendeesLearn,
    ProfilePicture,
    FirstNamePronunciation,
    LastNamePronunciation,
    Pronouns,
    FirstTalk,
    SpecialRequests,
    IntroBullet1,
    IntroBullet2,
    IntroBullet3,
    MobilePhone,
    Email,
}

impl AttrKey {
    pub const ALL: [AttrKey; 12] = [
        Self::AttendeesLearn,
        Self::ProfilePicture,
        Self::FirstNamePronunciation,
        Self::LastNamePronunciation,
        Self::Pronouns,
        Self::FirstTalk,
        Self::SpecialRequests,
        Self::IntroBullet1,
        Self::IntroBullet2,
        Self::IntroBullet3,
        Self::MobilePhone,
        Self::Email,
    ];

    /// Source column name in the flattened sessions export.
    pub fn column(&self) -> &'static str {
        match self {
            Self::AttendeesLearn => "What will attendees learn?",
            Self::ProfilePicture => "Profile Picture",
            Self::FirstNamePronunciation => "First name - pronunciation",
            Self::LastNamePronunciation => "Last name - pronunciation",
            Self::Pronouns => "Pronouns",
            Self::FirstTalk => "This would be my first Conference Talk",
            Self::SpecialRequests => "Special requests",
            Self::IntroBullet1 => "Speaker introduction - bullet 1",
            Self::IntroBullet2 => "Speaker introduction - bullet 2",
            Self::IntroBullet3 => "Speaker introduction - bullet 3",
            Self::MobilePhone => "Mobile # with Country Code (not shared publicly)",
            Self::Email => "Email (not shared publicly)",
        }
    }

    /// Column header used in detail views.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AttendeesLearn => "Attendees Learn",
            Self::ProfilePicture => "Profile Photo",
            Self::FirstNamePronunciation => "First Name (pronunciation)",
            Self::LastNamePronunciation => "Last Name (pronunciation)",
            Self::Pronouns => "Pronouns",
            Self::FirstTalk => "First Conf Talk",
            Self::SpecialRequests => "Special Requests",
            Self::IntroBullet1 => "Speaker Intro #1",
            Self::IntroBullet2 => "Speaker Intro #2",
            Self::IntroBullet3 => "Speaker Intro #3",
            Self::MobilePhone => "Mobile # (NOT PUBLIC)",
            Self::Email => "Email (NOT PUBLIC)",
        }
    }

    /// Contact fields that must never leave a restricted detail view.
    pub fn is_private(&self) -> bool {
        matches!(self, Self::MobilePhone | Self::Email)
    }

    /// Whether the attribute value is scoped to one speaker (and so merges
    /// across co-speaker rows) rather than to the session as a whole.
    pub fn is_speaker_scoped(&self) -> bool {
        !matches!(self, Self::AttendeesLearn | Self::SpecialRequests)
    }

    /// Reverse lookup from a source column name.
    pub fn from_column(column: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.column() == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_states_stay_distinct() {
        assert_eq!(FieldValue::from_cell(None), FieldValue::Unknown);
        assert_eq!(
            FieldValue::from_cell(Some("  ")),
            FieldValue::Provided(String::new())
        );
        assert_ne!(
            FieldValue::from_cell(None),
            FieldValue::from_cell(Some(""))
        );
        assert_eq!(FieldValue::from_cell(Some(" Room A ")).known(), Some("Room A"));
        assert_eq!(FieldValue::Provided(String::new()).known(), None);
    }

    #[test]
    fn test_attr_registry_round_trips_columns() {
        for key in AttrKey::ALL {
            assert_eq!(AttrKey::from_column(key.column()), Some(key));
        }
        assert_eq!(AttrKey::from_column("Favorite Color"), None);
    }

    #[test]
    fn test_private_attrs_are_contact_fields_only() {
        let private: Vec<_> = AttrKey::ALL.iter().filter(|k| k.is_private()).collect();
        assert_eq!(private, vec![&AttrKey::MobilePhone, &AttrKey::Email]);
    }

    #[test]
    fn test_declared_columns() {
        assert!(SCHEDULE_FIELDS.is_declared(COL_ROOM));
        assert!(!SCHEDULE_FIELDS.is_declared("Pronouns"));
        assert!(SESSION_FIELDS.is_declared("Pronouns"));
        assert!(SESSION_FIELDS.is_declared(COL_SESSION_ID));
        assert!(!SESSION_FIELDS.is_declared("Shirt Size"));
    }
}
