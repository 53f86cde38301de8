//! Application settings and paths.
//!
//! Settings are optional: every field falls back to the built-in default
//! when absent, and command-line flags take precedence over all of them.

use crate::error::{ConfigError, ConfigResult};
use crate::output::OutputFormat;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portprobe)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the platform configuration directory.
    pub fn new() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("", "", "portprobe").ok_or(ConfigError::DirectoryNotFound)?;
        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// User defaults for scan parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppSettings {
    /// Default concurrency level.
    pub concurrency: Option<usize>,
    /// Default per-probe timeout in seconds.
    pub timeout_secs: Option<f64>,
    /// Default highest port to scan.
    pub max_port: Option<u32>,
    /// Default output format when `--output` is given without `--format`.
    pub format: Option<OutputFormat>,
}

impl AppSettings {
    /// Load settings from `path` if given, else from the default location.
    ///
    /// An explicit path must exist. A missing default file yields the
    /// built-in defaults.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let file = match Paths::new() {
                    Ok(paths) => paths.settings_file(),
                    Err(e) => {
                        debug!(error = %e, "no config directory, using built-in defaults");
                        return Ok(Self::default());
                    }
                };
                if !file.exists() {
                    return Ok(Self::default());
                }
                Self::load_from(&file)
            }
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let settings = Self::from_json(&content)?;
        debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    fn from_json(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_settings() {
        let settings = AppSettings::from_json(r#"{ "concurrency": 50, "format": "csv" }"#).unwrap();
        assert_eq!(settings.concurrency, Some(50));
        assert_eq!(settings.format, Some(OutputFormat::Csv));
        assert_eq!(settings.timeout_secs, None);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = AppSettings::from_json(r#"{ "threads": 4 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "timeout_secs": 1.5, "max_port": 1024 }}"#).unwrap();

        let settings = AppSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.timeout_secs, Some(1.5));
        assert_eq!(settings.max_port, Some(1024));
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppSettings::load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }
}
