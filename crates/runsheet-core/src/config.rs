//! TOML-based run configuration.
//!
//! Declares the output groups (classification is configuration, not
//! algorithm) plus event metadata and rendering options. Every field has
//! a serde default so a minimal file, or no file at all, still yields a
//! working catch-all-only configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::partition::GroupDef;
use crate::project::ProjectorOptions;

/// Event metadata stamped into the output workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    /// Event name, e.g. "PyBay 2026".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Output and rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Name of the catch-all group that receives unmatched sessions.
    #[serde(default = "default_catch_all_group")]
    pub catch_all_group: String,
    /// Room label rendered for sessions with no assigned room.
    #[serde(default = "default_alternate_room_label")]
    pub alternate_room_label: String,
}

fn default_catch_all_group() -> String {
    "unassigned".to_string()
}

fn default_alternate_room_label() -> String {
    "Any room".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            catch_all_group: default_catch_all_group(),
            alternate_room_label: default_alternate_room_label(),
        }
    }
}

/// Full run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSheetConfig {
    #[serde(default)]
    pub event: EventConfig,
    #[serde(default, rename = "group")]
    pub groups: Vec<GroupDef>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl RunSheetConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&raw)?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the partitioner cannot apply deterministically.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for group in &self.groups {
            if group.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "group.name".to_string(),
                    message: "group name must not be empty".to_string(),
                });
            }
            if !seen.insert(group.name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    key: "group.name".to_string(),
                    message: format!("duplicate group name '{}'", group.name),
                });
            }
            if group.name == self.output.catch_all_group {
                return Err(ConfigError::InvalidValue {
                    key: "group.name".to_string(),
                    message: format!(
                        "group name '{}' collides with the catch-all group",
                        group.name
                    ),
                });
            }
            if group.rule.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: format!("group.{}", group.name),
                    message: "a declared group needs room_contains or format_contains"
                        .to_string(),
                });
            }
        }
        Ok(())
    }

    /// Rendering options for the view projector.
    pub fn projector_options(&self) -> ProjectorOptions {
        ProjectorOptions {
            alternate_room_label: self.output.alternate_room_label.clone(),
        }
    }

    /// A commented starter file for `config init`.
    pub fn starter_toml() -> &'static str {
        r#"# Run sheet configuration.
#
# Groups are evaluated in order. An exclusive group claims its sessions;
# a non-exclusive group (like a format bucket) may share sessions with
# later groups. Sessions matching no group land in the catch-all.

[event]
name = "My Conference 2026"

[[group]]
name = "workshops"
format_contains = "workshop"
exclusive = false

[[group]]
name = "track-a"
room_contains = "Main"
# Only restricted-distribution detail sheets carry contact fields.
detail_includes_private = true

[[group]]
name = "track-b"
room_contains = "Annex"
detail_includes_private = true

[output]
catch_all_group = "unassigned"
alternate_room_label = "Any room"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_config_parses() {
        let config = RunSheetConfig::from_toml_str(RunSheetConfig::starter_toml()).unwrap();
        assert_eq!(config.event.name.as_deref(), Some("My Conference 2026"));
        assert_eq!(config.groups.len(), 3);
        assert_eq!(config.groups[0].name, "workshops");
        assert!(!config.groups[0].exclusive);
        assert!(config.groups[1].exclusive);
        assert!(config.groups[1].detail_includes_private);
    }

    #[test]
    fn test_empty_config_defaults_to_catch_all_only() {
        let config = RunSheetConfig::from_toml_str("").unwrap();
        assert!(config.groups.is_empty());
        assert_eq!(config.output.catch_all_group, "unassigned");
        assert_eq!(config.output.alternate_room_label, "Any room");
    }

    #[test]
    fn test_duplicate_group_names_rejected() {
        let raw = r#"
[[group]]
name = "track-a"
room_contains = "Main"

[[group]]
name = "track-a"
room_contains = "Annex"
"#;
        let err = RunSheetConfig::from_toml_str(raw).unwrap_err();
        assert!(err.to_string().contains("duplicate group name"));
    }

    #[test]
    fn test_ruleless_group_rejected() {
        let raw = r#"
[[group]]
name = "everything"
"#;
        let err = RunSheetConfig::from_toml_str(raw).unwrap_err();
        assert!(err.to_string().contains("room_contains or format_contains"));
    }
}
