//! Core settings: database location and logging.
//!
//! # Responsibility
//! - Load settings from a JSON file.
//! - Apply `PERFUME_DB_PATH` / `PERFUME_LOG_LEVEL` environment overrides.
//!
//! # Invariants
//! - Missing keys fall back to defaults; unknown keys are rejected.
//! - Blank environment values are ignored.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "PERFUME_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "PERFUME_LOG_LEVEL";
const DEFAULT_DB_FILE_NAME: &str = "perfume_core.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub database_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read settings `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid settings `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Reads `path` as JSON settings, then applies environment overrides.
pub fn load_config(path: impl AsRef<Path>) -> Result<CoreConfig, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: CoreConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(apply_overrides(config, |key| std::env::var(key).ok()))
}

/// Defaults plus environment overrides, for runs without a settings file.
pub fn config_from_env() -> CoreConfig {
    apply_overrides(CoreConfig::default(), |key| std::env::var(key).ok())
}

fn apply_overrides(mut config: CoreConfig, lookup: impl Fn(&str) -> Option<String>) -> CoreConfig {
    let non_blank = |key: &str| {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    if let Some(path) = non_blank(ENV_DB_PATH) {
        config.database_path = PathBuf::from(path);
    }
    if let Some(level) = non_blank(ENV_LOG_LEVEL) {
        config.log_level = level;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::{apply_overrides, load_config, ConfigError, CoreConfig, ENV_DB_PATH, ENV_LOG_LEVEL};
    use std::path::PathBuf;

    #[test]
    fn partial_settings_fill_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "database_path": "/data/perfumes.db" }"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, CoreConfig::default().log_level);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "connection_string": "Server=." }"#).unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn overrides_replace_file_values_and_skip_blanks() {
        let base = CoreConfig {
            database_path: PathBuf::from("/from/file.db"),
            log_level: "info".to_string(),
            log_dir: None,
        };

        let overridden = apply_overrides(base.clone(), |key| match key {
            ENV_DB_PATH => Some(" /from/env.db ".to_string()),
            ENV_LOG_LEVEL => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(overridden.database_path, PathBuf::from("/from/env.db"));
        assert_eq!(overridden.log_level, "info");
        assert_eq!(apply_overrides(base.clone(), |_| None), base);
    }
}
