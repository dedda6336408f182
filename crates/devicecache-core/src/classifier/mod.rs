//! Classifier seam: the external user-agent parsing collaborator.
//!
//! The cache engine never parses a user agent itself. [`Classifier`] is the
//! opaque full parse run on a miss; [`PartialReclassifier`] is the narrow
//! hint-refinement interface used on a hit when client hints are present.

mod lookup;

pub use lookup::CachedClassifier;

use crate::entry::{CacheEntry, ClientHints, ClientInfo, OsInfo};

/// Full user-agent classification. Computed freshly on every call; caching
/// is the engine's job, not the adapter's.
///
/// For caching purposes the engine treats this as a pure function: the same
/// normalized key is assumed to classify identically absent client hints.
pub trait Classifier {
    fn classify(&self, user_agent: &str, hints: Option<&ClientHints>) -> CacheEntry;
}

/// Hint-driven refinement of a cached base result.
///
/// Exactly two capabilities: re-derive the client sub-record and re-derive
/// the OS sub-record, each seeded with the cached value so the adapter can
/// skip the expensive full user-agent parse. Implementations must produce
/// the same result a full reclassification with those hints would.
///
/// Returning `None` means "no refinement; keep the cached value".
pub trait PartialReclassifier {
    fn reclassify_client(
        &self,
        user_agent: &str,
        hints: &ClientHints,
        base: &ClientInfo,
    ) -> Option<ClientInfo>;

    fn reclassify_os(
        &self,
        user_agent: &str,
        hints: &ClientHints,
        base: Option<&OsInfo>,
    ) -> Option<OsInfo>;
}
