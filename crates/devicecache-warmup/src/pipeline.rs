//! The warm-up pipeline: Scanning -> Ranking -> Writing -> Evicting.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::time::Duration;

use regex::Regex;

use devicecache_core::classifier::Classifier;
use devicecache_core::config::WarmupConfig;
use devicecache_core::errors::WarmupError;
use devicecache_core::eviction;
use devicecache_core::key;
use devicecache_core::store::{EntryStore, WriteOutcome};

use crate::frequency::FrequencyTable;
use crate::types::WarmupReport;

/// Drives one warm-up run against an entry store.
///
/// The scan is single-threaded and paced with a tunable throttle
/// (`throttle_every_lines` / `throttle_pause_ms`) so a batch run on a
/// shared host does not saturate disk or CPU. Nothing prevents two runs
/// from overlapping; that coordination is the caller's responsibility.
pub struct WarmupPipeline<'a, C> {
    store: &'a EntryStore,
    classifier: &'a C,
    config: &'a WarmupConfig,
}

struct ScanOutcome {
    table: FrequencyTable,
    lines_scanned: u64,
    lines_matched: u64,
}

impl<'a, C: Classifier> WarmupPipeline<'a, C> {
    pub fn new(store: &'a EntryStore, classifier: &'a C, config: &'a WarmupConfig) -> Self {
        Self {
            store,
            classifier,
            config,
        }
    }

    /// Execute the full pipeline and report what happened.
    ///
    /// Fails before any write when the log cannot be opened or the config
    /// is invalid. Expected races are absorbed (unparseable log lines are
    /// skipped, a concurrent writer landing first counts as already
    /// cached), but a store write error aborts the run: it signals an
    /// environmental fault, such as a full disk or revoked permissions,
    /// that every subsequent write would hit too.
    pub fn run(&self) -> Result<WarmupReport, WarmupError> {
        self.config.validate()?;
        let pattern = self.config.compile_pattern()?;
        let ignores = self.config.compile_ignore_patterns()?;

        let file = File::open(&self.config.log_path).map_err(|e| WarmupError::LogUnreadable {
            path: self.config.log_path.clone(),
            source: e,
        })?;

        let scan = self.scan(BufReader::new(file), &pattern, &ignores)?;
        tracing::info!(
            lines_scanned = scan.lines_scanned,
            lines_matched = scan.lines_matched,
            distinct_agents = scan.table.len(),
            "scan phase complete"
        );

        let ranked = scan.table.into_ranked();

        let mut report = WarmupReport {
            lines_scanned: scan.lines_scanned,
            lines_matched: scan.lines_matched,
            ..Default::default()
        };
        let mut selected_occurrences: u64 = 0;

        for (agent, count) in ranked {
            // Ranked descending, so the first agent below the threshold
            // ends the phase, not just this iteration.
            if count < self.config.min_occurrences {
                break;
            }
            if report.entries_written + report.entries_already_cached
                >= self.store.max_entries()
            {
                break;
            }

            if self.store.read(&agent).is_some() {
                report.entries_already_cached += 1;
            } else {
                let entry = self.classifier.classify(&agent, None);
                match self.store.write(&agent, &entry)? {
                    WriteOutcome::Written(_) => report.entries_written += 1,
                    // A concurrent writer landed between the read and the
                    // write; their entry wins.
                    WriteOutcome::AlreadyCached => report.entries_already_cached += 1,
                }
            }
            selected_occurrences += count;
        }
        tracing::info!(
            written = report.entries_written,
            already_cached = report.entries_already_cached,
            "writing phase complete"
        );

        let total = self.store.count();
        let max = self.store.max_entries();
        if total > max {
            report.entries_evicted = eviction::enforce_capacity(self.store, total - max);
        }

        if report.lines_scanned > 0 {
            report.estimated_hit_ratio =
                selected_occurrences as f64 / report.lines_scanned as f64;
        }

        Ok(report)
    }

    fn scan<R: BufRead>(
        &self,
        reader: R,
        pattern: &Regex,
        ignores: &[Regex],
    ) -> Result<ScanOutcome, WarmupError> {
        let mut table = FrequencyTable::new();
        let mut lines_scanned: u64 = 0;
        let mut lines_matched: u64 = 0;

        for line in reader.lines() {
            if lines_scanned >= self.config.max_lines {
                break;
            }
            lines_scanned += 1;

            let line = match line {
                Ok(line) => line,
                // Binary junk in a text log is noise, not a fatal fault.
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => continue,
                Err(e) => {
                    return Err(WarmupError::LogReadFailed {
                        path: self.config.log_path.clone(),
                        source: e,
                    })
                }
            };

            if let Some(agent) = self.extract_agent(&line, pattern, ignores) {
                table.record(agent);
                lines_matched += 1;
            }

            if self.config.throttle_every_lines > 0
                && lines_scanned % self.config.throttle_every_lines == 0
            {
                std::thread::sleep(Duration::from_millis(self.config.throttle_pause_ms));
            }
        }

        Ok(ScanOutcome {
            table,
            lines_scanned,
            lines_matched,
        })
    }

    /// Pull the user-agent field out of one log line, returning the
    /// normalized agent if it survives the noise filters. Length bounds
    /// apply to the raw extracted field: an adversarially long agent is
    /// dropped, not truncated into acceptance.
    fn extract_agent(&self, line: &str, pattern: &Regex, ignores: &[Regex]) -> Option<String> {
        let caps = pattern.captures(line)?;
        let raw = caps.get(self.config.capture_group)?.as_str();

        let len = raw.chars().count();
        if len < self.config.min_agent_len || len > self.config.max_agent_len {
            return None;
        }

        let agent = key::normalize(raw);
        if agent.is_empty() {
            return None;
        }
        if ignores.iter().any(|re| re.is_match(&agent)) {
            return None;
        }
        Some(agent)
    }
}
