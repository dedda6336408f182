//! Warm-up pipeline errors.

use std::path::PathBuf;

use super::StoreError;

/// Errors that abort a warm-up run.
///
/// All of these are raised before or during the scan phase, i.e. before any
/// cache write happens; a run that reaches the writing phase only reports
/// per-entry outcomes through the `WarmupReport`.
#[derive(Debug, thiserror::Error)]
pub enum WarmupError {
    #[error("Access log unreadable at {path}: {source}")]
    LogUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error reading access log {path}: {source}")]
    LogReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] super::ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
