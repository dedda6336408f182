//! Versioned JSON codec for cache entries.
//!
//! Decoding is deliberately forgiving about *whether* it succeeds and strict
//! about *what* it accepts: any document that is not a JSON object carrying
//! a supported version and an `os` key is reported as absent rather than an
//! error. A partially-written or corrupted file must degrade to a cache
//! miss, never to a hit with fabricated fields and never to a hard failure.

use serde_json::Value;

use super::types::CacheEntry;

/// Current on-disk format version, stored as `"v"` in every document.
pub const FORMAT_VERSION: u64 = 1;

/// Serialize an entry into its on-disk representation.
pub fn encode_entry(entry: &CacheEntry) -> Result<Vec<u8>, serde_json::Error> {
    let mut doc = serde_json::to_value(entry)?;
    // to_value of a struct always yields an object
    if let Value::Object(map) = &mut doc {
        map.insert("v".to_string(), Value::from(FORMAT_VERSION));
    }
    serde_json::to_vec(&doc)
}

/// Decode an on-disk document, returning `None` for anything that does not
/// match the expected shape:
/// - top level is not a JSON object,
/// - missing or unsupported (newer) `"v"` version,
/// - missing `"os"` key (the partial-write sentinel),
/// - structural mismatch in any field.
pub fn decode_entry(bytes: &[u8]) -> Option<CacheEntry> {
    let doc: Value = serde_json::from_slice(bytes).ok()?;
    let obj = doc.as_object()?;
    let version = obj.get("v")?.as_u64()?;
    if version > FORMAT_VERSION {
        return None;
    }
    if !obj.contains_key("os") {
        return None;
    }
    serde_json::from_value(doc).ok()
}
