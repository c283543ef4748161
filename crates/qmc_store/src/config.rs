//! Store configuration.
//!
//! Loaded from a TOML file or built in code, then injected into
//! [`DataStore::from_config`](crate::DataStore::from_config). The library
//! never reads process environment variables.

use std::path::{Path, PathBuf};

use qmc_core::NetFamily;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::file::family_file;

/// Default directory holding matrix files and the database.
pub const DEFAULT_DATA_ROOT: &str = "../data";

/// Default SQLite database file name.
pub const DEFAULT_DATABASE_FILE: &str = "digitalnet.sqlite3";

/// Persistent backend selected by a [`StoreConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// One binary `<abbreviation>.dat` file per family.
    #[default]
    File,
    /// One SQLite database for all families.
    Relational,
}

/// Store configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the data files
    pub data_root: PathBuf,
    /// Backend to open
    pub backend: BackendKind,
    /// Database file name inside `data_root`
    pub database_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from(DEFAULT_DATA_ROOT),
            backend: BackendKind::File,
            database_file: DEFAULT_DATABASE_FILE.to_string(),
        }
    }
}

impl StoreConfig {
    /// Create a new StoreConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the data root.
    pub fn with_data_root(mut self, data_root: impl Into<PathBuf>) -> Self {
        self.data_root = data_root.into();
        self
    }

    /// Sets the backend.
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        let config: StoreConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_root.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataRoot);
        }
        let file_name_only = Path::new(&self.database_file)
            .file_name()
            .is_some_and(|name| name == self.database_file.as_str());
        if !file_name_only {
            return Err(ConfigError::InvalidDatabaseFile(self.database_file.clone()));
        }
        Ok(())
    }

    /// Binary matrix file for a family, `<data_root>/<abbreviation>.dat`.
    ///
    /// For the Sobol family this is the Joe–Kuo seed file.
    pub fn family_path(&self, family: NetFamily) -> PathBuf {
        family_file(&self.data_root, family)
    }

    /// Database path, `<data_root>/<database_file>`.
    pub fn database_path(&self) -> PathBuf {
        self.data_root.join(&self.database_file)
    }
}
