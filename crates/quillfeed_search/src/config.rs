//! Engine configuration.
//!
//! # Responsibility
//! - Define the file-backed configuration the host process hands to the
//!   engine at startup: base directory, store filenames, paging, logging.
//!
//! # Invariants
//! - All engine-owned state lives under `base_dir`.
//! - A loaded configuration is validated before use.

use crate::service::search::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type ConfigResult<T> = Result<T, ConfigError>;

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
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

/// Engine configuration, loaded from a JSON file under the base directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding every engine-owned store and the log directory.
    pub base_dir: PathBuf,
    /// Filename of the relational database (tags live here).
    pub database_file: String,
    /// Filename of the inverted index store.
    pub index_file: String,
    /// Default page size for search results.
    pub page_size: u32,
    /// Log level passed to `init_logging`.
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(".quillfeed"),
            database_file: "quillfeed.db".to_string(),
            index_file: "search_index.db".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            log_level: crate::logging::default_log_level().to_string(),
        }
    }
}

impl EngineConfig {
    /// Loads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("base_dir cannot be empty".to_string()));
        }
        if self.database_file.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "database_file cannot be empty".to_string(),
            ));
        }
        if self.index_file.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "index_file cannot be empty".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid(
                "page_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.base_dir.join(&self.database_file)
    }

    pub fn index_path(&self) -> PathBuf {
        self.base_dir.join(&self.index_file)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }
}
