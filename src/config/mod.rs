//! Configuration file handling for rescat
//!
//! A single optional `rescat.yaml`:
//!
//! ```yaml
//! cache:
//!   max_entries: 256
//!   max_bytes: 16777216
//!   ttl_secs: 86400
//!   disk: true
//! search:
//!   prefix_floor: 60
//!   fuzzy_ceiling: 59
//!   fuzzy_cutoff: 30
//! install:
//!   parallel_fetches: 4
//!   max_attempts: 3
//!   rollback_on_error: false
//! ```
//!
//! Every section and field is optional; missing ones take their defaults.

pub mod sections;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use sections::{CacheSettings, InstallSettings};

use crate::error::{Result, config};
use crate::search::SearchConfig;

/// Configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "rescat.yaml";

/// Environment variable pointing at a configuration file
pub const CONFIG_ENV: &str = "RESCAT_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub cache: CacheSettings,
    pub search: SearchConfig,
    pub install: InstallSettings,
}

impl Config {
    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`; a missing file yields the defaults
    ///
    /// # Errors
    ///
    /// `ConfigReadFailed` when the file exists but cannot be read,
    /// `ConfigParseFailed` or `ConfigInvalid` for bad content.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no configuration file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(config::read_failed(path.display().to_string(), e.to_string())),
        };

        Self::from_yaml(&content).map_err(|e| match e {
            crate::error::RescatError::ConfigParseFailed { reason, .. } => {
                config::parse_failed(path.display().to_string(), reason)
            }
            other => other,
        })
    }

    /// Locate the configuration file: `rescat.yaml` in `dir`, then `RESCAT_CONFIG`
    pub fn locate(dir: &Path) -> Option<PathBuf> {
        let local = dir.join(CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        std::env::var_os(CONFIG_ENV).map(PathBuf::from)
    }

    /// Load from the discovered location, or defaults when there is none
    pub fn discover() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        match Self::locate(&cwd) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.cache.validate()?;
        self.search.validate()?;
        self.install.validate()
    }
}
