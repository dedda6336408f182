//! Entry store errors.

use std::path::PathBuf;

/// Errors that can occur while reading or mutating the on-disk shard tree.
///
/// Missing or corrupt entry files are deliberately *not* errors: they
/// degrade to cache misses inside `EntryStore::read`. Only operations that
/// change the tree surface failures here.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize cache entry for {path}: {message}")]
    SerializeFailed { path: PathBuf, message: String },

    #[error("Refusing to clear {base_dir}: not beneath expected root {expected_root}")]
    UnsafeClearPath {
        base_dir: PathBuf,
        expected_root: PathBuf,
    },
}
