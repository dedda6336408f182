//! Warm-up run reporting.

use serde::{Deserialize, Serialize};

/// Observational summary of one warm-up run. Reported to the caller; never
/// feeds back into control flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarmupReport {
    /// Log lines read before the scan stopped.
    pub lines_scanned: u64,
    /// Lines that matched the extraction pattern and passed the filters.
    pub lines_matched: u64,
    /// Fresh cache entries persisted this run.
    pub entries_written: usize,
    /// Selected agents that were already cached (still occupy slots).
    pub entries_already_cached: usize,
    /// Entries removed to converge on the capacity bound.
    pub entries_evicted: usize,
    /// Sum of selected agents' occurrence counts divided by lines scanned:
    /// the fraction of observed traffic the warmed cache would have served.
    pub estimated_hit_ratio: f64,
}
