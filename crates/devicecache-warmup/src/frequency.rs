//! In-memory user-agent frequency table.

use rustc_hash::FxHashMap;

/// Occurrence tally keyed by normalized user agent. Owned by a single
/// warm-up run and discarded when the run ends.
#[derive(Debug, Default)]
pub struct FrequencyTable {
    counts: FxHashMap<String, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, agent: String) {
        *self.counts.entry(agent).or_insert(0) += 1;
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Consume the table and return `(agent, count)` pairs sorted
    /// descending by count, ties broken by ascending agent so the order is
    /// deterministic given identical input.
    pub fn into_ranked(self) -> Vec<(String, u64)> {
        let mut ranked: Vec<_> = self.counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }
}
