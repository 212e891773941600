//! Tracker configuration.
//!
//! # Responsibility
//! - Load settings from an optional TOML file.
//! - Apply environment overrides (`JOBTRACK_DB_PATH`, `JOBTRACK_LOG_DIR`).
//!
//! # Invariants
//! - Every field has a default; a missing file yields defaults.
//! - Default paths are absolute so they satisfy logging bootstrap rules.

use crate::model::caller::{Caller, Role};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "JOBTRACK_DB_PATH";
pub const ENV_LOG_DIR: &str = "JOBTRACK_LOG_DIR";

const APP_DIR_NAME: &str = "jobtrack";
const DB_FILE_NAME: &str = "jobtrack.sqlite3";

/// Configuration load failure.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Runtime settings for the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    /// `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Directory receiving export files.
    pub export_dir: PathBuf,
    /// Owner key for records created by this user.
    pub user_id: String,
    pub role: Role,
    /// Recipient of notification e-mails; `None` disables them.
    pub notification_email: Option<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let base = default_base_dir();
        Self {
            db_path: base.join(DB_FILE_NAME),
            log_dir: base.join("logs"),
            log_level: crate::logging::default_log_level().to_string(),
            export_dir: base.join("exports"),
            user_id: "local".to_string(),
            role: Role::Member,
            notification_email: None,
        }
    }
}

impl TrackerConfig {
    /// Loads `path` when it exists, otherwise defaults; then applies env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parses one TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Applies environment overrides through `lookup`; blank values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        if let Some(value) = non_blank(ENV_DB_PATH) {
            self.db_path = PathBuf::from(value);
        }
        if let Some(value) = non_blank(ENV_LOG_DIR) {
            self.log_dir = PathBuf::from(value);
        }
    }

    /// Caller identity described by this config.
    pub fn caller(&self) -> Caller {
        Caller {
            user_id: self.user_id.clone(),
            role: self.role,
        }
    }
}

fn default_base_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::{TrackerConfig, ENV_DB_PATH, ENV_LOG_DIR};
    use crate::model::caller::Role;
    use std::path::PathBuf;

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let config = TrackerConfig::from_toml_str(
            r#"
            user_id = "ada"
            role = "admin"
            notification_email = "ada@example.com"
            "#,
        )
        .unwrap();
        let defaults = TrackerConfig::default();
        assert_eq!(config.user_id, "ada");
        assert_eq!(config.role, Role::Admin);
        assert_eq!(config.notification_email.as_deref(), Some("ada@example.com"));
        assert_eq!(config.db_path, defaults.db_path);
        assert!(config.log_dir.is_absolute());
    }

    #[test]
    fn unknown_role_is_a_parse_error() {
        assert!(TrackerConfig::from_toml_str("role = \"owner\"").is_err());
    }

    #[test]
    fn env_overrides_ignore_blank_values() {
        let mut config = TrackerConfig::default();
        let original_log_dir = config.log_dir.clone();
        config.apply_env(|key| match key {
            ENV_DB_PATH => Some("/tmp/other.sqlite3".to_string()),
            ENV_LOG_DIR => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.db_path, PathBuf::from("/tmp/other.sqlite3"));
        assert_eq!(config.log_dir, original_log_dir);
    }

    #[test]
    fn load_falls_back_to_defaults_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrackerConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.user_id, "local");
    }

    #[test]
    fn from_file_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "user_id = [").unwrap();
        let err = TrackerConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }
}
