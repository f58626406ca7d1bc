//! Runtime configuration.
//!
//! # Responsibility
//! - Resolve backend, data directory, user id, log level and passphrase.
//! - Layer sources: defaults, then `workday.json`, then environment.
//!
//! # Invariants
//! - `data_dir` is always set; every on-disk artifact lives below it.
//! - Unknown backend strings are rejected, not ignored.

use crate::logging::default_log_level;
use crate::storage::{DocumentStore, JsonFileStore, SqliteDocumentStore, StoreResult};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_FILE_NAME: &str = "workday.json";
pub const DOCUMENT_DB_FILE_NAME: &str = "documents.db";
pub const DEFAULT_USER_ID: &str = "default-user";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, serde_json::Error),
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(path, err) => write!(f, "failed to read `{}`: {err}", path.display()),
            Self::Parse(path, err) => write!(f, "invalid config `{}`: {err}", path.display()),
            Self::InvalidValue { key, value } => write!(f, "invalid value `{value}` for `{key}`"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(_, err) => Some(err),
            Self::Parse(_, err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

/// Which storage backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// JSON files in the data directory.
    #[default]
    Local,
    /// Per-user documents in a SQLite database.
    Document,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "document" | "sqlite" => Ok(Self::Document),
            other => Err(ConfigError::InvalidValue {
                key: "backend",
                value: other.to_string(),
            }),
        }
    }
}

/// Shape of `workday.json`; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
struct FileConfig {
    backend: Option<Backend>,
    user_id: Option<String>,
    log_level: Option<String>,
    passphrase: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: Backend,
    pub data_dir: PathBuf,
    pub user_id: String,
    pub log_level: String,
    pub passphrase: Option<String>,
}

impl AppConfig {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::default(),
            data_dir: data_dir.into(),
            user_id: DEFAULT_USER_ID.to_string(),
            log_level: default_log_level().to_string(),
            passphrase: None,
        }
    }

    /// Defaults overlaid with `<data_dir>/workday.json` when it exists.
    pub fn load(data_dir: impl Into<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::with_data_dir(data_dir);
        let path = config.config_path();
        if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .map_err(|err| ConfigError::Io(path.clone(), err))?;
            let file: FileConfig =
                serde_json::from_str(&raw).map_err(|err| ConfigError::Parse(path.clone(), err))?;
            config.merge_file(file);
        }
        Ok(config)
    }

    /// Applies `WORKDAY_*` overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(value) = lookup("WORKDAY_BACKEND") {
            self.backend = value.parse()?;
        }
        if let Some(value) = lookup("WORKDAY_USER").filter(|value| !value.trim().is_empty()) {
            self.user_id = value.trim().to_string();
        }
        if let Some(value) = lookup("WORKDAY_LOG") {
            self.log_level = value;
        }
        if let Some(value) = lookup("WORKDAY_PASSPHRASE") {
            self.passphrase = Some(value);
        }
        Ok(())
    }

    pub fn apply_process_env(&mut self) -> ConfigResult<()> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn document_db_path(&self) -> PathBuf {
        self.data_dir.join(DOCUMENT_DB_FILE_NAME)
    }

    /// Opens the configured backend.
    pub fn open_store(&self) -> StoreResult<Box<dyn DocumentStore>> {
        match self.backend {
            Backend::Local => Ok(Box::new(JsonFileStore::open(&self.data_dir)?)),
            Backend::Document => {
                ensure_dir(&self.data_dir)?;
                Ok(Box::new(SqliteDocumentStore::open(
                    self.document_db_path(),
                    self.user_id.clone(),
                )?))
            }
        }
    }

    fn merge_file(&mut self, file: FileConfig) {
        if let Some(backend) = file.backend {
            self.backend = backend;
        }
        if let Some(user_id) = file.user_id.filter(|value| !value.trim().is_empty()) {
            self.user_id = user_id;
        }
        if let Some(log_level) = file.log_level {
            self.log_level = log_level;
        }
        if file.passphrase.is_some() {
            self.passphrase = file.passphrase;
        }
    }
}

fn ensure_dir(dir: &Path) -> StoreResult<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, Backend, ConfigError, DEFAULT_USER_ID};
    use std::collections::HashMap;

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("workday.json"),
            r#"{"backend":"document","user_id":"ops-team"}"#,
        )
        .unwrap();

        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.backend, Backend::Document);
        assert_eq!(config.user_id, "ops-team");
        assert_eq!(config.passphrase, None);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.user_id, DEFAULT_USER_ID);
    }

    #[test]
    fn env_overrides_and_rejects_unknown_backend() {
        let mut config = AppConfig::with_data_dir("/tmp/workday");
        let vars: HashMap<&str, &str> =
            HashMap::from([("WORKDAY_BACKEND", "sqlite"), ("WORKDAY_USER", " me ")]);
        config
            .apply_env(|key| vars.get(key).map(|value| value.to_string()))
            .unwrap();
        assert_eq!(config.backend, Backend::Document);
        assert_eq!(config.user_id, "me");

        let err = config
            .apply_env(|key| (key == "WORKDAY_BACKEND").then(|| "cloud".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "backend", .. }));
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("workday.json"), "{").unwrap();
        assert!(matches!(
            AppConfig::load(dir.path()),
            Err(ConfigError::Parse(_, _))
        ));
    }
}
