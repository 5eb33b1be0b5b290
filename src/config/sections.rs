//! `cache` and `install` configuration sections

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache;
use crate::error::{Result, config};
use crate::installer::{InstallOptions, RetryPolicy};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSettings {
    /// Entry bound of each in-memory cache
    pub max_entries: usize,
    /// Byte budget of each in-memory cache
    pub max_bytes: u64,
    /// Lifetime of disk entries
    pub ttl_secs: u64,
    /// Cache root; falls back to `RESCAT_CACHE_DIR`, then the user cache dir
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Keep parsed catalogs and artifacts on disk between runs
    pub disk: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_entries: 256,
            max_bytes: 16 * 1024 * 1024,
            ttl_secs: 86_400,
            dir: None,
            disk: true,
        }
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Configured root, else the environment/platform default
    pub fn root(&self) -> Result<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => cache::cache_dir(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(config::invalid("cache.max_entries must be greater than 0"));
        }
        if self.max_bytes == 0 {
            return Err(config::invalid("cache.max_bytes must be greater than 0"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallSettings {
    pub parallel_fetches: usize,
    /// Fetch attempts per resource, first one included
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub overwrite: bool,
    pub rollback_on_error: bool,
}

impl Default for InstallSettings {
    fn default() -> Self {
        let options = InstallOptions::default();
        Self {
            parallel_fetches: options.parallel_fetches,
            max_attempts: options.retry.max_attempts,
            initial_backoff_ms: 200,
            max_backoff_ms: 2_000,
            overwrite: options.overwrite,
            rollback_on_error: options.rollback_on_error,
        }
    }
}

impl InstallSettings {
    pub fn validate(&self) -> Result<()> {
        if self.parallel_fetches == 0 {
            return Err(config::invalid("install.parallel_fetches must be greater than 0"));
        }
        if self.max_attempts == 0 {
            return Err(config::invalid("install.max_attempts must be greater than 0"));
        }
        if self.initial_backoff_ms > self.max_backoff_ms {
            return Err(config::invalid(format!(
                "install.initial_backoff_ms ({}) exceeds install.max_backoff_ms ({})",
                self.initial_backoff_ms, self.max_backoff_ms
            )));
        }
        Ok(())
    }

    pub fn options(&self) -> InstallOptions {
        InstallOptions {
            overwrite: self.overwrite,
            rollback_on_error: self.rollback_on_error,
            parallel_fetches: self.parallel_fetches,
            retry: RetryPolicy {
                max_attempts: self.max_attempts,
                initial_backoff: Duration::from_millis(self.initial_backoff_ms),
                max_backoff: Duration::from_millis(self.max_backoff_ms),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_defaults_match_installer() {
        let options = InstallSettings::default().options();
        assert_eq!(options.retry, RetryPolicy::default());
        assert_eq!(options.parallel_fetches, InstallOptions::default().parallel_fetches);
    }

    #[test]
    fn test_inverted_backoff_rejected() {
        let settings = InstallSettings {
            initial_backoff_ms: 5_000,
            ..InstallSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_explicit_cache_root() {
        let settings = CacheSettings {
            dir: Some(PathBuf::from("/tmp/rescat")),
            ..CacheSettings::default()
        };
        assert_eq!(settings.root().unwrap(), PathBuf::from("/tmp/rescat"));
    }
}
