//! Warm-up pipeline configuration.

use std::path::PathBuf;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Default extraction pattern: Apache combined log format with the
/// user-agent field in capture group 14.
pub const DEFAULT_PATTERN: &str = r#"^(\S+) (\S+) (\S+) (\S+) \[([^:]+):(\d+:\d+:\d+) ([^\]]+)\] "(\S+) (.*?) (\S+)" (\S+) (\S+) "([^"]*)" "([^"]*)" (\d+)$"#;

/// Capture group holding the user-agent field in [`DEFAULT_PATTERN`].
pub const DEFAULT_CAPTURE_GROUP: usize = 14;

/// Hard ceiling on scanned lines, guaranteeing termination on unbounded
/// (e.g. piped or still-growing) inputs.
pub const DEFAULT_MAX_LINES: u64 = 5_000_000;

/// Configuration for a warm-up run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmupConfig {
    /// Line-oriented traffic log to mine.
    pub log_path: PathBuf,
    /// Regex applied to each line; the user-agent field is pulled from
    /// `capture_group`.
    pub pattern: String,
    /// 1-based capture group index of the user-agent field.
    pub capture_group: usize,
    /// Minimum occurrence count for an agent to deserve a cache slot.
    pub min_occurrences: u64,
    /// Maximum lines to scan before stopping.
    pub max_lines: u64,
    /// Extracted agents shorter than this are log noise and skipped.
    pub min_agent_len: usize,
    /// Extracted agents longer than this are adversarial and skipped.
    pub max_agent_len: usize,
    /// Agents matching any of these patterns are never cached
    /// (health-check probers and similar synthetic traffic).
    pub ignore_patterns: Vec<String>,
    /// Pause after every N scanned lines to avoid saturating shared hosts.
    /// 0 disables throttling.
    pub throttle_every_lines: u64,
    /// Pause duration in milliseconds.
    pub throttle_pause_ms: u64,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("/var/log/httpd/access_log"),
            pattern: DEFAULT_PATTERN.to_string(),
            capture_group: DEFAULT_CAPTURE_GROUP,
            min_occurrences: 10,
            max_lines: DEFAULT_MAX_LINES,
            min_agent_len: 10,
            max_agent_len: 500,
            ignore_patterns: vec!["^Amazon-Route53-Health-Check-Service".to_string()],
            throttle_every_lines: 10_000,
            throttle_pause_ms: 25,
        }
    }
}

impl WarmupConfig {
    /// Compile the extraction pattern.
    pub fn compile_pattern(&self) -> Result<Regex, ConfigError> {
        Regex::new(&self.pattern).map_err(|e| ConfigError::InvalidValue {
            field: "warmup.pattern".to_string(),
            message: e.to_string(),
        })
    }

    /// Compile the ignore patterns.
    pub fn compile_ignore_patterns(&self) -> Result<Vec<Regex>, ConfigError> {
        self.ignore_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidValue {
                    field: "warmup.ignore_patterns".to_string(),
                    message: format!("{p}: {e}"),
                })
            })
            .collect()
    }

    /// Validate the configuration values, including that the extraction
    /// pattern compiles and actually has the configured capture group.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pattern = self.compile_pattern()?;
        if self.capture_group == 0 || self.capture_group >= pattern.captures_len() {
            return Err(ConfigError::ValidationFailed {
                field: "warmup.capture_group".to_string(),
                message: format!(
                    "group {} out of range; pattern has {} capture group(s)",
                    self.capture_group,
                    pattern.captures_len() - 1
                ),
            });
        }
        self.compile_ignore_patterns()?;
        if self.max_lines == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "warmup.max_lines".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.min_agent_len > self.max_agent_len {
            return Err(ConfigError::ValidationFailed {
                field: "warmup.min_agent_len".to_string(),
                message: format!(
                    "must not exceed max_agent_len ({})",
                    self.max_agent_len
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        WarmupConfig::default().validate().unwrap();
    }

    #[test]
    fn default_pattern_extracts_user_agent() {
        let config = WarmupConfig::default();
        let regex = config.compile_pattern().unwrap();
        let line = r#"www.example.com 203.0.113.9 - - [10/Oct/2024:13:55:36 -0700] "GET /index.html HTTP/1.1" 200 2326 "http://example.com/start" "Mozilla/5.0 (Windows NT 10.0; Win64; x64)" 512"#;
        let caps = regex.captures(line).expect("line should match");
        assert_eq!(
            caps.get(config.capture_group).unwrap().as_str(),
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64)"
        );
    }

    #[test]
    fn bad_pattern_rejected() {
        let config = WarmupConfig {
            pattern: "([unclosed".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "warmup.pattern"
        ));
    }

    #[test]
    fn capture_group_out_of_range_rejected() {
        let config = WarmupConfig {
            pattern: "(.*)".to_string(),
            capture_group: 5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed { ref field, .. })
                if field == "warmup.capture_group"
        ));
    }

    #[test]
    fn default_ignore_pattern_matches_route53_prober() {
        let config = WarmupConfig::default();
        let ignores = config.compile_ignore_patterns().unwrap();
        let ua = "Amazon-Route53-Health-Check-Service (ref d14cb74a; report http://amzn.to/1vsZADi)";
        assert!(ignores.iter().any(|re| re.is_match(ua)));
    }
}
