//! Key codec: user-agent normalization, fingerprinting, and shard paths.
//!
//! Everything here is a pure function of its inputs so the on-disk layout is
//! reproducible across runs and platforms. The only side effect lives in
//! [`ensure_shard_dir`], which writers call before an atomic rename.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use xxhash_rust::xxh3::xxh3_128;

/// Number of leading fingerprint hex chars used as the shard directory name.
/// Fixed by design: changing it invalidates every existing entry path.
pub const SHARD_PREFIX_LEN: usize = 3;

/// Maximum length (in chars) of a normalized user-agent key.
pub const MAX_KEY_LEN: usize = 500;

/// File extension for persisted cache entries.
pub const ENTRY_EXT: &str = "json";

/// Normalize a raw user-agent string into the canonical cache key.
///
/// Strips surrounding whitespace and double quotes (access logs quote the
/// user-agent field), truncates to [`MAX_KEY_LEN`] chars on a char boundary,
/// then strips again so truncation cannot expose a trailing quote or space.
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    let edge = |c: char| c == '"' || c.is_whitespace();
    let trimmed = raw.trim_matches(edge);
    let truncated = match trimmed.char_indices().nth(MAX_KEY_LEN) {
        Some((byte_idx, _)) => &trimmed[..byte_idx],
        None => trimmed,
    };
    truncated.trim_matches(edge).to_string()
}

/// Deterministic 128-bit content digest of a normalized key, rendered as
/// 32 lowercase hex chars. Used only for path derivation; the cache never
/// performs reverse lookups.
pub fn fingerprint(key: &str) -> String {
    format!("{:032x}", xxh3_128(key.as_bytes()))
}

/// Shard directory for a fingerprint: `base_dir/<first 3 hex chars>`.
pub fn shard_dir(base_dir: &Path, fp: &str) -> PathBuf {
    base_dir.join(&fp[..SHARD_PREFIX_LEN])
}

/// Full entry path for a fingerprint:
/// `base_dir/<3-hex-shard>/<fingerprint>.json`.
pub fn entry_path(base_dir: &Path, fp: &str) -> PathBuf {
    shard_dir(base_dir, fp).join(format!("{fp}.{ENTRY_EXT}"))
}

/// Create the base and shard directories for a fingerprint. Writer-only.
pub fn ensure_shard_dir(base_dir: &Path, fp: &str) -> io::Result<PathBuf> {
    let dir = shard_dir(base_dir, fp);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}
