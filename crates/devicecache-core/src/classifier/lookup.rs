//! Read-through cache front for the classifier.

use crate::entry::{CacheEntry, ClientHints};
use crate::errors::StoreError;
use crate::store::EntryStore;

use super::{Classifier, PartialReclassifier};

/// Serves classifications from the entry store, falling back to the
/// wrapped classifier on a miss and persisting the fresh result
/// (first-write-wins) for future lookups.
pub struct CachedClassifier<C> {
    store: EntryStore,
    classifier: C,
}

impl<C> CachedClassifier<C>
where
    C: Classifier + PartialReclassifier,
{
    pub fn new(store: EntryStore, classifier: C) -> Self {
        Self { store, classifier }
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// Classify `user_agent`, consulting the cache first.
    ///
    /// On a hit with client hints, only the hint-sensitive sub-records are
    /// re-derived: the client (and only when the cached client is a
    /// browser) and the OS. Device, bot, brand, and model come from the
    /// cached entry untouched. On a miss the full classifier runs and the
    /// result is persisted; a concurrent writer landing first simply wins.
    pub fn lookup(
        &self,
        user_agent: &str,
        hints: Option<&ClientHints>,
    ) -> Result<CacheEntry, StoreError> {
        if let Some(mut entry) = self.store.read(user_agent) {
            if let Some(hints) = hints.filter(|h| !h.is_empty()) {
                self.refine(user_agent, hints, &mut entry);
            }
            return Ok(entry);
        }

        let entry = self.classifier.classify(user_agent, hints);
        self.store.write(user_agent, &entry)?;
        Ok(entry)
    }

    fn refine(&self, user_agent: &str, hints: &ClientHints, entry: &mut CacheEntry) {
        if let Some(client) = entry.client.as_ref().filter(|c| c.is_browser()) {
            if let Some(refined) =
                self.classifier.reclassify_client(user_agent, hints, client)
            {
                entry.client = Some(refined);
            }
        }
        if let Some(refined) =
            self.classifier
                .reclassify_os(user_agent, hints, entry.os.as_ref())
        {
            entry.os = Some(refined);
        }
    }
}
