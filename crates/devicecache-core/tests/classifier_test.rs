//! CachedClassifier tests: read-through flow and client-hint refinement.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use devicecache_core::classifier::{CachedClassifier, Classifier, PartialReclassifier};
use devicecache_core::config::CacheConfig;
use devicecache_core::entry::{CacheEntry, ClientHints, ClientInfo, OsInfo};
use devicecache_core::store::EntryStore;
use tempfile::TempDir;

// ---- Helpers ----

fn test_store(dir: &TempDir) -> EntryStore {
    EntryStore::new(&CacheConfig {
        base_dir: dir.path().join("devicecache"),
        expected_root: dir.path().to_path_buf(),
        max_entries: 100,
    })
}

fn browser_entry() -> CacheEntry {
    CacheEntry {
        bot: None,
        brand: Some("Apple".to_string()),
        client: Some(ClientInfo {
            kind: Some("browser".to_string()),
            name: Some("Safari".to_string()),
            version: Some("12.1".to_string()),
            engine: Some("WebKit".to_string()),
            engine_version: None,
        }),
        device: Some(1),
        model: Some("iPhone".to_string()),
        os: Some(OsInfo {
            name: Some("iOS".to_string()),
            version: Some("12.3".to_string()),
            platform: None,
        }),
    }
}

fn hints() -> ClientHints {
    ClientHints::from_headers([
        ("sec-ch-ua-platform", "\"Windows\""),
        ("sec-ch-ua-platform-version", "\"14.0.0\""),
    ])
}

/// Classifier double that counts full parses and marks refined records so
/// tests can tell which path produced a field. Counters are shared so a
/// clone moved into the cache front still reports to the test.
#[derive(Default, Clone)]
struct StubClassifier {
    full_parses: Arc<AtomicUsize>,
    client_refinements: Arc<AtomicUsize>,
    os_refinements: Arc<AtomicUsize>,
}

impl Classifier for StubClassifier {
    fn classify(&self, _user_agent: &str, _hints: Option<&ClientHints>) -> CacheEntry {
        self.full_parses.fetch_add(1, Ordering::SeqCst);
        browser_entry()
    }
}

impl PartialReclassifier for StubClassifier {
    fn reclassify_client(
        &self,
        _user_agent: &str,
        _hints: &ClientHints,
        base: &ClientInfo,
    ) -> Option<ClientInfo> {
        self.client_refinements.fetch_add(1, Ordering::SeqCst);
        Some(ClientInfo {
            version: Some("98.0".to_string()),
            ..base.clone()
        })
    }

    fn reclassify_os(
        &self,
        _user_agent: &str,
        _hints: &ClientHints,
        base: Option<&OsInfo>,
    ) -> Option<OsInfo> {
        self.os_refinements.fetch_add(1, Ordering::SeqCst);
        Some(OsInfo {
            version: Some("11".to_string()),
            ..base.cloned().unwrap_or_default()
        })
    }
}

const UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 12_3_1 like Mac OS X) AppleWebKit/605.1.15";

// ---- Tests ----

#[test]
fn miss_classifies_once_then_serves_from_cache() {
    let dir = TempDir::new().unwrap();
    let stub = StubClassifier::default();
    let cached = CachedClassifier::new(test_store(&dir), stub.clone());

    let first = cached.lookup(UA, None).unwrap();
    assert_eq!(first, browser_entry());
    let second = cached.lookup(UA, None).unwrap();
    assert_eq!(second, browser_entry());

    // only the first lookup ran the expensive parse
    assert_eq!(stub.full_parses.load(Ordering::SeqCst), 1);
    assert_eq!(cached.store().count(), 1);
}

#[test]
fn hit_with_hints_refines_only_client_and_os() {
    let dir = TempDir::new().unwrap();
    let stub = StubClassifier::default();
    let cached = CachedClassifier::new(test_store(&dir), stub.clone());

    cached.lookup(UA, None).unwrap();
    let refined = cached.lookup(UA, Some(&hints())).unwrap();

    assert_eq!(stub.full_parses.load(Ordering::SeqCst), 1);
    assert_eq!(stub.client_refinements.load(Ordering::SeqCst), 1);
    assert_eq!(stub.os_refinements.load(Ordering::SeqCst), 1);

    // hint-sensitive fields were re-derived from the cached base
    assert_eq!(refined.client.as_ref().unwrap().version.as_deref(), Some("98.0"));
    assert_eq!(refined.os.as_ref().unwrap().version.as_deref(), Some("11"));
    // seeded sub-fields carried over from the cached records
    assert_eq!(refined.client.as_ref().unwrap().name.as_deref(), Some("Safari"));
    assert_eq!(refined.os.as_ref().unwrap().name.as_deref(), Some("iOS"));

    // hint-insensitive fields are untouched
    let base = browser_entry();
    assert_eq!(refined.device, base.device);
    assert_eq!(refined.bot, base.bot);
    assert_eq!(refined.brand, base.brand);
    assert_eq!(refined.model, base.model);

    // the persisted entry stays the un-refined base
    assert_eq!(cached.store().read(UA), Some(base));
}

#[test]
fn hit_with_empty_hints_returns_cached_entry_verbatim() {
    let dir = TempDir::new().unwrap();
    let stub = StubClassifier::default();
    let cached = CachedClassifier::new(test_store(&dir), stub);

    cached.lookup(UA, None).unwrap();
    let entry = cached.lookup(UA, Some(&ClientHints::new())).unwrap();
    assert_eq!(entry, browser_entry());
}

#[test]
fn non_browser_client_is_not_hint_refined() {
    let dir = TempDir::new().unwrap();
    let store = test_store(&dir);

    let mut app_entry = browser_entry();
    app_entry.client.as_mut().unwrap().kind = Some("mobile app".to_string());
    store.write(UA, &app_entry).unwrap();

    let stub = StubClassifier::default();
    let cached = CachedClassifier::new(store, stub.clone());
    let entry = cached.lookup(UA, Some(&hints())).unwrap();

    // the client record is kept; only the OS was refined
    assert_eq!(entry.client, app_entry.client);
    assert_eq!(entry.os.as_ref().unwrap().version.as_deref(), Some("11"));
    assert_eq!(stub.client_refinements.load(Ordering::SeqCst), 0);
    assert_eq!(stub.os_refinements.load(Ordering::SeqCst), 1);
}
