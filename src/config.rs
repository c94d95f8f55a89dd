//! Export configuration
//!
//! A flat set of keys with defaults, read from an optional TOML file. The
//! configuration is a plain value passed into the export; there is no global
//! settings object.

use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Settings that steer which source projects feed which export pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Name of the special inbox project
    pub inbox_project: String,
    /// Roots of the active tree; each becomes an Everdo area
    pub target_projects: Vec<String>,
    /// Roots of the someday/maybe tree
    pub someday_projects: Vec<String>,
    /// Projects copied verbatim as plain active projects
    pub other_projects: Vec<String>,
    /// Projects copied as notebooks, their items becoming notes
    pub notebooks: Vec<String>,
    /// Label name that marks an item as waiting
    pub waiting_label: String,
    /// Label color code that turns a label into a contact tag
    pub contact_color: i64,
    /// Label color code that turns a label into an `@context` label
    pub context_color: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inbox_project: "Inbox".to_string(),
            target_projects: vec!["GTD".to_string()],
            someday_projects: vec!["Someday/Maybe".to_string()],
            other_projects: Vec::new(),
            notebooks: Vec::new(),
            waiting_label: "waiting".to_string(),
            contact_color: 9,
            context_color: 0,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Keys not present in the file keep their defaults. The file itself must
    /// exist; callers without a configuration file use [`Config::default`].
    ///
    /// # Arguments
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    /// The validated configuration
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        tracing::debug!("Read config file {}", path.display());
        let config = Self::from_toml(&content)?;
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| ExportError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for contradictions
    ///
    /// A project listed as both an active root and a someday root would be
    /// exported twice with different placements, so it is rejected up front.
    pub fn validate(&self) -> Result<()> {
        if self.inbox_project.trim().is_empty() {
            return Err(ExportError::Config("inbox-project must not be blank".into()));
        }

        let mut named = self
            .target_projects
            .iter()
            .chain(&self.someday_projects)
            .chain(&self.other_projects)
            .chain(&self.notebooks);
        if let Some(blank) = named.find(|n| n.trim().is_empty()) {
            return Err(ExportError::Config(format!(
                "project names must not be blank (got {:?})",
                blank
            )));
        }

        let targets: HashSet<&str> = self.target_projects.iter().map(|n| n.trim()).collect();
        let mut overlap: Vec<&str> = self
            .someday_projects
            .iter()
            .map(|n| n.trim())
            .filter(|n| targets.contains(n))
            .collect();
        if !overlap.is_empty() {
            overlap.sort_unstable();
            return Err(ExportError::Config(format!(
                "projects listed as both target and someday roots: {}",
                overlap.join(", ")
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.inbox_project, "Inbox");
        assert_eq!(config.target_projects, vec!["GTD"]);
        assert_eq!(config.waiting_label, "waiting");
        assert_eq!(config.contact_color, 9);
        assert_eq!(config.context_color, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
target-projects = ["Work", "Home"]
notebooks = ["Lesestund"]
"#,
        )
        .unwrap();
        assert_eq!(config.target_projects, vec!["Work", "Home"]);
        assert_eq!(config.notebooks, vec!["Lesestund"]);
        assert_eq!(config.inbox_project, "Inbox");
        assert_eq!(config.someday_projects, vec!["Someday/Maybe"]);
    }

    #[test]
    fn test_overlapping_roots_rejected() {
        let err = Config::from_toml(
            r#"
target-projects = ["GTD", "Later"]
someday-projects = [" Later "]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::Config(ref msg) if msg.contains("Later")));
    }

    #[test]
    fn test_blank_names_rejected() {
        let config = Config {
            other_projects: vec!["  ".to_string()],
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            inbox_project: String::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ExportError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "waiting-label = \"venter\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.waiting_label, "venter");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml("target-projects = 12").unwrap_err();
        assert!(matches!(err, ExportError::Config(_)));
    }
}
