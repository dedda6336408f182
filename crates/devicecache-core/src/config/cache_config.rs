//! Cache engine configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Default capacity bound for the on-disk cache (entry count).
pub const DEFAULT_MAX_ENTRIES: usize = 200_000;

/// Configuration for the on-disk entry store.
///
/// The base directory is threaded through `EntryStore::new` explicitly;
/// there is no process-wide cache-directory setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding the shard tree. Created on first write.
    pub base_dir: PathBuf,
    /// Root the base directory must lie beneath for destructive
    /// operations (`clear_all`) to be allowed.
    pub expected_root: PathBuf,
    /// Maximum number of entries the store should hold; enforced by the
    /// eviction policy, not by individual writes.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("tmp/devicecache"),
            expected_root: PathBuf::from("tmp"),
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl CacheConfig {
    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entries == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "cache.max_entries".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.base_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "cache.base_dir".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.expected_root.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "cache.expected_root".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
