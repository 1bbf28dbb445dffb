//! Journal configuration, stored as TOML.
//!
//! ```toml
//! data_file = "/home/me/.local/share/fxjournal/journal.json"
//! currency = "EUR"
//! log_level = "info"
//! pretty_export = true
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "fxjournal";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Where the journal's JSON document lives.
    pub data_file: PathBuf,
    /// ISO currency code used when printing monetary amounts.
    pub currency: String,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Pretty-print export artifacts and the data file.
    pub pretty_export: bool,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            currency: "USD".to_string(),
            log_level: "warn".to_string(),
            pretty_export: true,
        }
    }
}

impl JournalConfig {
    /// Load a config from a TOML file. The file must exist.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load the config at the default location, falling back to defaults
    /// when no file exists there.
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_config_file() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// `<config_dir>/fxjournal/config.toml`, if the platform has a config dir.
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// `<data_dir>/fxjournal/journal.json`, or `./journal.json` when the
/// platform reports no data dir.
pub fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_default()
        .join("journal.json")
}
