// Roster file layout, optionally overridden by a roster.yaml file

use crate::error::{Result, RosterError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the data directory
pub const CONFIG_FILE_NAME: &str = "roster.yaml";

/// File names used by the roster. Relative paths resolve against the data
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RosterConfig {
    pub students_file: String,
    pub teachers_file: String,
    pub json_export: String,
    pub xml_export: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        RosterConfig {
            students_file: "list.txt".to_string(),
            teachers_file: "teachers.txt".to_string(),
            json_export: "school_data.json".to_string(),
            xml_export: "school_data.xml".to_string(),
        }
    }
}

impl RosterConfig {
    /// Parse a roster.yaml file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RosterError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a roster config from a YAML string. An empty document yields
    /// the defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(RosterConfig::default());
        }
        let config: RosterConfig = serde_yaml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Load `roster.yaml` from the data directory if present, otherwise
    /// fall back to the defaults.
    pub fn discover(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            log::info!("Using config {}", path.display());
            Self::load(&path)
        } else {
            Ok(RosterConfig::default())
        }
    }

    /// Resolve every file name against the data directory
    pub fn resolve(&self, data_dir: &Path) -> DataFiles {
        DataFiles {
            students: data_dir.join(&self.students_file),
            teachers: data_dir.join(&self.teachers_file),
            json_export: data_dir.join(&self.json_export),
            xml_export: data_dir.join(&self.xml_export),
        }
    }

    fn check(&self) -> Result<()> {
        let names = [
            ("students_file", &self.students_file),
            ("teachers_file", &self.teachers_file),
            ("json_export", &self.json_export),
            ("xml_export", &self.xml_export),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(RosterError::Config(format!("'{key}' must not be empty")));
            }
        }
        if self.students_file == self.teachers_file {
            return Err(RosterError::Config(
                "students_file and teachers_file must differ".to_string(),
            ));
        }
        Ok(())
    }
}

/// Absolute locations of every file the roster reads or writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub students: PathBuf,
    pub teachers: PathBuf,
    pub json_export: PathBuf,
    pub xml_export: PathBuf,
}

/// Display name of a roster file (its file name, or the full path if it has none)
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = RosterConfig::default();
        assert_eq!(config.students_file, "list.txt");
        assert_eq!(config.teachers_file, "teachers.txt");
        assert_eq!(RosterConfig::from_yaml("").unwrap(), config);
    }

    #[test]
    fn test_partial_override() {
        let config = RosterConfig::from_yaml("students_file: pupils.csv\n").unwrap();
        assert_eq!(config.students_file, "pupils.csv");
        assert_eq!(config.teachers_file, "teachers.txt");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(RosterConfig::from_yaml("student_file: x.txt\n").is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = RosterConfig::from_yaml("xml_export: ''\n").unwrap_err();
        assert!(err.to_string().contains("xml_export"));
    }

    #[test]
    fn test_same_files_rejected() {
        let yaml = "students_file: all.txt\nteachers_file: all.txt\n";
        assert!(matches!(
            RosterConfig::from_yaml(yaml),
            Err(RosterError::Config(_))
        ));
    }

    #[test]
    fn test_discover_and_resolve() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(
            RosterConfig::discover(tmp.path()).unwrap(),
            RosterConfig::default()
        );

        std::fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "teachers_file: staff/teachers.txt\n",
        )
        .unwrap();
        let config = RosterConfig::discover(tmp.path()).unwrap();
        let files = config.resolve(tmp.path());
        assert_eq!(files.teachers, tmp.path().join("staff/teachers.txt"));
        assert_eq!(files.students, tmp.path().join("list.txt"));
        assert_eq!(display_name(&files.teachers), "teachers.txt");
    }
}
