//! devicecache-core: disk-backed cache engine for user-agent classification
//!
//! This crate provides the persistent cache that lets a high-volume request
//! path skip the expensive user-agent parse:
//! - Key codec: normalization, fingerprinting, shard-path derivation
//! - Entry store: crash-safe sharded storage with atomic-replace writes
//! - Eviction: bounded capacity via least-recently-accessed deletion
//! - Classifier seam: the external parsing collaborator, behind traits
//! - Config: TOML-based layered configuration
//! - Errors: one enum per subsystem

pub mod classifier;
pub mod config;
pub mod entry;
pub mod errors;
pub mod eviction;
pub mod key;
pub mod store;

// Re-exports for convenience
pub use classifier::{CachedClassifier, Classifier, PartialReclassifier};
pub use config::{CacheConfig, DeviceCacheConfig, WarmupConfig};
pub use entry::{BotInfo, CacheEntry, ClientHints, ClientInfo, OsInfo};
pub use errors::{ConfigError, StoreError, WarmupError};
pub use eviction::enforce_capacity;
pub use store::{EntryStat, EntryStore, WriteOutcome};
