//! Core data structures for persisted classification results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Bot classification, present only when the classifier recognized
/// automated traffic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BotInfo {
    /// Bot name (e.g. "Googlebot")
    pub name: Option<String>,
    /// Bot category (e.g. "Search bot")
    pub category: Option<String>,
    /// Documentation URL
    pub url: Option<String>,
    /// Operator of the bot
    pub producer: Option<String>,
}

/// Client (browser / app / library) sub-record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Client type (e.g. "browser", "mobile app"), serialized as `type`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Client name (e.g. "Chrome")
    pub name: Option<String>,
    /// Client version string
    pub version: Option<String>,
    /// Rendering engine (e.g. "Blink")
    pub engine: Option<String>,
    /// Rendering engine version
    pub engine_version: Option<String>,
}

impl ClientInfo {
    /// Whether this client was classified as a browser. Only browser
    /// clients are client-hint sensitive.
    pub fn is_browser(&self) -> bool {
        self.kind.as_deref() == Some("browser")
    }
}

/// Operating system sub-record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OsInfo {
    /// OS name (e.g. "Windows")
    pub name: Option<String>,
    /// OS version string
    pub version: Option<String>,
    /// Platform / architecture (e.g. "x64")
    pub platform: Option<String>,
}

/// One persisted classification result.
///
/// Fixed-shape record with explicit optional fields; the codec validates
/// shape on load and degrades anything unexpected to a cache miss.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Bot classification, if any
    pub bot: Option<BotInfo>,
    /// Device manufacturer
    pub brand: Option<String>,
    /// Client sub-record
    pub client: Option<ClientInfo>,
    /// Device category code
    pub device: Option<u8>,
    /// Device model
    pub model: Option<String>,
    /// Operating system sub-record
    pub os: Option<OsInfo>,
}

/// Structured client-hint headers (`Sec-CH-UA-*`), passed through to the
/// classifier verbatim. Never persisted; a cached entry is keyed by the
/// user-agent string alone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientHints {
    headers: BTreeMap<String, String>,
}

impl ClientHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an iterator of header name/value pairs.
    pub fn from_headers<I, K, V>(headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
