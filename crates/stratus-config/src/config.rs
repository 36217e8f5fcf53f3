//! `Config`: the parsed contents of a project's `stratus.yml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use stratus_utils::error::ConfigError;

/// Marker configuration filename at a project root. Its presence (not its
/// contents) is what identifies a directory as a project.
pub const DEFAULT_CONFIG_FILENAME: &str = "stratus.yml";

/// Default configuration written by `stratus new`.
const DEFAULT_CONFIG_TEMPLATE: &str = "\
service: my-pipeline

provider:
  name: aws
  runtime: python3.12
  region: us-west-2

custom:
  pythonRequirements:
    slim: true
    useStaticCache: false
";

/// Parsed project configuration.
///
/// Only the `service` name is interpreted; everything else is carried as-is
/// so the deployment manifest written at build time preserves whatever the
/// user put in `stratus.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Logical name of the deployed service.
    pub service: String,

    /// Remaining configuration, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Config {
    /// Load the configuration from the marker file of the given project root.
    pub fn from_project(project_path: &Path) -> Result<Self, ConfigError> {
        Self::from_file(&project_path.join(DEFAULT_CONFIG_FILENAME))
    }

    /// Load and parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::InvalidFile {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        })?;
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::InvalidFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Serialize the current configuration to `path`, overwriting any
    /// previous content. Used for the deployment manifest at the build root.
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let rendered = serde_yaml::to_string(self).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        fs::write(path, rendered).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// The `stratus.yml` contents scaffolded into a new project.
    #[must_use]
    pub fn default_template() -> &'static str {
        DEFAULT_CONFIG_TEMPLATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_parses() {
        let config: Config = serde_yaml::from_str(Config::default_template()).unwrap();
        assert_eq!(config.service, "my-pipeline");
        assert!(config.extra.contains_key("provider"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let td = tempfile::TempDir::new().unwrap();
        let err = Config::from_project(td.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn malformed_yaml_is_invalid_file() {
        let td = tempfile::TempDir::new().unwrap();
        let path = td.path().join(DEFAULT_CONFIG_FILENAME);
        fs::write(&path, "service: [unclosed").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFile { .. }));
    }

    #[test]
    fn to_file_round_trips_unknown_keys() {
        let td = tempfile::TempDir::new().unwrap();
        let src = td.path().join(DEFAULT_CONFIG_FILENAME);
        fs::write(&src, "service: demo\nplugins:\n  - serverless-python-requirements\n").unwrap();

        let config = Config::from_file(&src).unwrap();
        let out = td.path().join("serverless.yml");
        config.to_file(&out).unwrap();

        let reloaded = Config::from_file(&out).unwrap();
        assert_eq!(reloaded.service, "demo");
        assert!(reloaded.extra.contains_key("plugins"));
    }

    #[test]
    fn to_file_overwrites_previous_manifest() {
        let td = tempfile::TempDir::new().unwrap();
        let out = td.path().join("serverless.yml");
        fs::write(&out, "stale content").unwrap();

        let config: Config = serde_yaml::from_str("service: fresh").unwrap();
        config.to_file(&out).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains("service: fresh"));
        assert!(!written.contains("stale"));
    }
}
