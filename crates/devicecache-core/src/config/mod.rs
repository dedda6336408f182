//! Configuration system for devicecache.
//! TOML-based, layered resolution: env > config file > defaults.

pub mod cache_config;
pub mod devicecache_config;
pub mod warmup_config;

pub use cache_config::CacheConfig;
pub use devicecache_config::DeviceCacheConfig;
pub use warmup_config::WarmupConfig;
