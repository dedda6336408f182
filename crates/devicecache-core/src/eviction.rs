//! Capacity enforcement: least-recently-accessed eviction.
//!
//! An LRU approximation driven by filesystem metadata: every successful
//! read refreshes an entry's access timestamp, and eviction removes the
//! entries whose timestamps are oldest. No logical access counts are
//! tracked anywhere.

use crate::store::EntryStore;

/// Delete the `excess` least-recently-accessed entries from `store`.
///
/// Victims are ordered ascending by `(last_access, path)`; the path tie
/// break keeps the selection deterministic when timestamps collide. An
/// `excess` of 0 is a no-op, and asking for more than exists deletes all
/// that exist. Individual deletions that fail (the file was already removed
/// by a concurrent process) are skipped; the batch never aborts.
///
/// Returns the number of entries actually deleted.
pub fn enforce_capacity(store: &EntryStore, excess: usize) -> usize {
    if excess == 0 {
        return 0;
    }

    let mut entries: Vec<_> = store.list_entries().collect();
    entries.sort_by(|a, b| {
        a.last_access
            .cmp(&b.last_access)
            .then_with(|| a.path.cmp(&b.path))
    });

    let mut deleted = 0;
    for entry in entries.iter().take(excess) {
        if store.delete_path(&entry.path) {
            deleted += 1;
        }
    }

    tracing::info!(requested = excess, deleted, "evicted least-recently-accessed entries");
    deleted
}
