//! Top-level devicecache configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{CacheConfig, WarmupConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`DEVICECACHE_*`)
/// 2. Config file (`devicecache.toml`)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeviceCacheConfig {
    pub cache: CacheConfig,
    pub warmup: WarmupConfig,
}

impl DeviceCacheConfig {
    /// Load configuration from `path` with layered resolution and validate
    /// the result. The file was explicitly requested, so its absence is an
    /// error rather than a silent fall-through to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mut config: Self = toml::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `DEVICECACHE_*` environment-variable overrides.
    fn apply_env_overrides(config: &mut DeviceCacheConfig) {
        if let Ok(dir) = std::env::var("DEVICECACHE_BASE_DIR") {
            config.cache.base_dir = PathBuf::from(dir);
        }
        if let Ok(root) = std::env::var("DEVICECACHE_EXPECTED_ROOT") {
            config.cache.expected_root = PathBuf::from(root);
        }
        if let Ok(max) = std::env::var("DEVICECACHE_MAX_ENTRIES") {
            if let Ok(max) = max.parse() {
                config.cache.max_entries = max;
            }
        }
        if let Ok(path) = std::env::var("DEVICECACHE_LOG_PATH") {
            config.warmup.log_path = PathBuf::from(path);
        }
        if let Ok(min) = std::env::var("DEVICECACHE_MIN_OCCURRENCES") {
            if let Ok(min) = min.parse() {
                config.warmup.min_occurrences = min;
            }
        }
    }

    /// Validate all sub-configs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cache.validate()?;
        self.warmup.validate()?;
        Ok(())
    }
}
