//! On-disk entry store owning the shard tree.
//!
//! Layout: `<base_dir>/<3-hex-shard>/<fingerprint>.json`, one file per
//! entry. Multiple independent processes may read and write concurrently;
//! the filesystem's atomic rename is the sole coordination primitive.
//! Writers stage a temp file in the destination shard directory and rename
//! it into place, so readers see no file, a complete old file, or a
//! complete new file — never a partial one.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::config::CacheConfig;
use crate::entry::{decode_entry, encode_entry, CacheEntry};
use crate::errors::StoreError;
use crate::key;

/// Disambiguates temp files when one process writes the same key twice
/// before the first rename lands.
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Outcome of a first-write-wins [`EntryStore::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A fresh entry was persisted at this path.
    Written(PathBuf),
    /// A valid entry already existed; nothing was touched.
    AlreadyCached,
}

/// One enumerated entry file with its last-access timestamp.
#[derive(Debug, Clone)]
pub struct EntryStat {
    pub path: PathBuf,
    pub last_access: SystemTime,
}

/// Reads, writes, and enumerates cache entries beneath a configured base
/// directory. The store exclusively owns the shard tree; no other component
/// writes to it directly.
#[derive(Debug, Clone)]
pub struct EntryStore {
    base_dir: PathBuf,
    expected_root: PathBuf,
    max_entries: usize,
}

impl EntryStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            base_dir: config.base_dir.clone(),
            expected_root: config.expected_root.clone(),
            max_entries: config.max_entries,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Capacity bound this store was configured with. Enforced by the
    /// eviction policy, not by individual writes.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Path an entry for `user_agent` would live at. Diagnostic; derived
    /// from the normalized key, so equal-after-normalization agents map to
    /// the same file.
    pub fn entry_path(&self, user_agent: &str) -> PathBuf {
        let fp = key::fingerprint(&key::normalize(user_agent));
        key::entry_path(&self.base_dir, &fp)
    }

    /// Look up the cached classification for `user_agent`.
    ///
    /// Returns `None` for a missing file, a file deleted between path
    /// derivation and load (reads open the file directly instead of
    /// checking existence first, so that race degrades to a miss), and any
    /// content that fails shape validation. Never errors: a corrupt cache
    /// entry is a cache miss, not a fault.
    pub fn read(&self, user_agent: &str) -> Option<CacheEntry> {
        let path = self.entry_path(user_agent);
        let bytes = fs::read(&path).ok()?;
        let entry = decode_entry(&bytes)?;
        touch_access(&path);
        Some(entry)
    }

    /// Persist `entry` under `user_agent`, first-write-wins.
    ///
    /// Returns [`WriteOutcome::AlreadyCached`] without touching disk when a
    /// valid entry is already present. A corrupt or partially-shaped file
    /// does not block the write; it is replaced.
    pub fn write(
        &self,
        user_agent: &str,
        entry: &CacheEntry,
    ) -> Result<WriteOutcome, StoreError> {
        if self.read(user_agent).is_some() {
            return Ok(WriteOutcome::AlreadyCached);
        }
        let path = self.write_atomic(user_agent, entry)?;
        Ok(WriteOutcome::Written(path))
    }

    /// Administrative forced refresh: replace whatever is stored under
    /// `user_agent`, skipping the first-write-wins gate.
    pub fn overwrite(
        &self,
        user_agent: &str,
        entry: &CacheEntry,
    ) -> Result<PathBuf, StoreError> {
        self.write_atomic(user_agent, entry)
    }

    fn write_atomic(&self, user_agent: &str, entry: &CacheEntry) -> Result<PathBuf, StoreError> {
        let fp = key::fingerprint(&key::normalize(user_agent));
        let shard = key::ensure_shard_dir(&self.base_dir, &fp).map_err(|e| {
            StoreError::IoError {
                path: key::shard_dir(&self.base_dir, &fp),
                source: e,
            }
        })?;
        let path = key::entry_path(&self.base_dir, &fp);

        let bytes = encode_entry(entry).map_err(|e| StoreError::SerializeFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;

        // Stage in the same directory so the rename cannot cross filesystems.
        let tmp = shard.join(format!(
            "{fp}.{}.{}.tmp",
            std::process::id(),
            TMP_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        if let Err(e) = fs::write(&tmp, &bytes) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::IoError { path: tmp, source: e });
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::IoError { path, source: e });
        }
        tracing::trace!(path = %path.display(), "wrote cache entry");
        Ok(path)
    }

    /// Remove the entry for `user_agent` if present. Idempotent: returns
    /// `Ok(false)` when there was nothing to remove.
    pub fn delete(&self, user_agent: &str) -> Result<bool, StoreError> {
        let path = self.entry_path(user_agent);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::IoError { path, source: e }),
        }
    }

    /// Best-effort removal of a specific entry file; used by the eviction
    /// policy, which tolerates files vanishing under it.
    pub fn delete_path(&self, path: &Path) -> bool {
        fs::remove_file(path).is_ok()
    }

    /// Number of entry files beneath the base directory. Temp files and
    /// foreign files are excluded.
    pub fn count(&self) -> usize {
        self.list_entries().count()
    }

    /// Stream all entry files with their last-access timestamps. Lazy: the
    /// store may hold hundreds of thousands of entries. Files that vanish
    /// mid-walk are skipped.
    pub fn list_entries(&self) -> impl Iterator<Item = EntryStat> + '_ {
        WalkDir::new(&self.base_dir)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == key::ENTRY_EXT))
            .filter_map(|e| {
                let meta = e.metadata().ok()?;
                let last_access = meta.accessed().or_else(|_| meta.modified()).ok()?;
                Some(EntryStat {
                    path: e.into_path(),
                    last_access,
                })
            })
    }

    /// Remove every entry and shard directory beneath the base directory.
    ///
    /// Refuses with [`StoreError::UnsafeClearPath`] unless the base
    /// directory lies beneath the configured expected root, so a
    /// misconfigured path can never wipe an unrelated tree. Returns the
    /// number of entries removed.
    pub fn clear_all(&self) -> Result<usize, StoreError> {
        if !self.base_dir.starts_with(&self.expected_root) {
            return Err(StoreError::UnsafeClearPath {
                base_dir: self.base_dir.clone(),
                expected_root: self.expected_root.clone(),
            });
        }
        if !self.base_dir.exists() {
            return Ok(0);
        }

        let removed = self.count();
        let children = fs::read_dir(&self.base_dir).map_err(|e| StoreError::IoError {
            path: self.base_dir.clone(),
            source: e,
        })?;
        for child in children {
            let child = child.map_err(|e| StoreError::IoError {
                path: self.base_dir.clone(),
                source: e,
            })?;
            let path = child.path();
            let result = if child.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            if let Err(e) = result {
                if e.kind() != std::io::ErrorKind::NotFound {
                    return Err(StoreError::IoError { path, source: e });
                }
            }
        }
        tracing::info!(
            base_dir = %self.base_dir.display(),
            removed,
            "cleared cache directory"
        );
        Ok(removed)
    }
}

/// Refresh a file's access timestamp after a hit, best-effort. Keeps the
/// least-recently-accessed eviction signal meaningful on `noatime` and
/// `relatime` mounts where reads alone would not update it.
fn touch_access(path: &Path) {
    let now = SystemTime::now();
    if let Ok(file) = fs::File::options().write(true).open(path) {
        let _ = file.set_times(fs::FileTimes::new().set_accessed(now));
    }
}
