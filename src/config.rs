//! Scan configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SquatError};

/// Default edit-distance threshold
pub const DEFAULT_THRESHOLD: usize = 1;

/// How results from several corpus sources are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportMode {
    /// One report per source (one per observation window)
    #[default]
    PerSource,
    /// All successful sources merged into a single report
    Combined,
}

impl FromStr for ReportMode {
    type Err = SquatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "per-source" | "per_source" | "persource" => Ok(ReportMode::PerSource),
            "combined" => Ok(ReportMode::Combined),
            other => Err(SquatError::ConfigError(format!(
                "Unknown report mode: {}",
                other
            ))),
        }
    }
}

/// Scan options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Edit-distance threshold (inclusive, distance 0 never matches)
    pub threshold: usize,
    /// Per-source or combined reporting
    pub report_mode: ReportMode,
    /// Scan sources on worker threads
    pub parallel: bool,
    /// Verdict LRU cache size (0 disables the cache)
    pub cache_size: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            report_mode: ReportMode::PerSource,
            parallel: false,
            cache_size: 0,
        }
    }
}

impl ScanOptions {
    /// Create new scan options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the edit-distance threshold.
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the report mode.
    pub fn with_report_mode(mut self, mode: ReportMode) -> Self {
        self.report_mode = mode;
        self
    }

    /// Enable or disable parallel scanning across sources.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the verdict cache size.
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }

    /// Defaults overlaid with `TYPOSQUAT_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().merge_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from a key lookup. Unparsable values are logged and
    /// ignored.
    pub fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup("TYPOSQUAT_THRESHOLD") {
            match raw.trim().parse::<usize>() {
                Ok(t) => self.threshold = t,
                Err(_) => warn!(value = %raw, "ignoring invalid TYPOSQUAT_THRESHOLD"),
            }
        }

        if let Some(raw) = lookup("TYPOSQUAT_REPORT_MODE") {
            match raw.parse::<ReportMode>() {
                Ok(mode) => self.report_mode = mode,
                Err(_) => warn!(value = %raw, "ignoring invalid TYPOSQUAT_REPORT_MODE"),
            }
        }

        if let Some(raw) = lookup("TYPOSQUAT_PARALLEL") {
            match parse_bool(&raw) {
                Some(b) => self.parallel = b,
                None => warn!(value = %raw, "ignoring invalid TYPOSQUAT_PARALLEL"),
            }
        }

        if let Some(raw) = lookup("TYPOSQUAT_CACHE_SIZE") {
            match raw.trim().parse::<usize>() {
                Ok(size) => self.cache_size = size,
                Err(_) => warn!(value = %raw, "ignoring invalid TYPOSQUAT_CACHE_SIZE"),
            }
        }

        self
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let opts = ScanOptions::default();
        assert_eq!(opts.threshold, 1);
        assert_eq!(opts.report_mode, ReportMode::PerSource);
        assert!(!opts.parallel);
        assert_eq!(opts.cache_size, 0);
    }

    #[test]
    fn test_builder() {
        let opts = ScanOptions::new()
            .with_threshold(2)
            .with_report_mode(ReportMode::Combined)
            .with_parallel(true)
            .with_cache_size(4096);
        assert_eq!(opts.threshold, 2);
        assert_eq!(opts.report_mode, ReportMode::Combined);
        assert!(opts.parallel);
        assert_eq!(opts.cache_size, 4096);
    }

    #[test]
    fn test_merge_env() {
        let opts = ScanOptions::default().merge_env(lookup(&[
            ("TYPOSQUAT_THRESHOLD", "2"),
            ("TYPOSQUAT_REPORT_MODE", "Combined"),
            ("TYPOSQUAT_PARALLEL", "yes"),
            ("TYPOSQUAT_CACHE_SIZE", "128"),
        ]));
        assert_eq!(opts.threshold, 2);
        assert_eq!(opts.report_mode, ReportMode::Combined);
        assert!(opts.parallel);
        assert_eq!(opts.cache_size, 128);
    }

    #[test]
    fn test_merge_env_ignores_garbage() {
        let opts = ScanOptions::default().merge_env(lookup(&[
            ("TYPOSQUAT_THRESHOLD", "-1"),
            ("TYPOSQUAT_REPORT_MODE", "weekly"),
            ("TYPOSQUAT_PARALLEL", "maybe"),
        ]));
        assert_eq!(opts, ScanOptions::default());
    }

    #[test]
    fn test_merge_env_large_threshold() {
        let max = usize::MAX.to_string();
        let opts =
            ScanOptions::default().merge_env(lookup(&[("TYPOSQUAT_THRESHOLD", max.as_str())]));
        assert_eq!(opts.threshold, usize::MAX);
    }

    #[test]
    fn test_report_mode_from_str() {
        assert_eq!("per-source".parse::<ReportMode>().unwrap(), ReportMode::PerSource);
        assert_eq!(" COMBINED ".parse::<ReportMode>().unwrap(), ReportMode::Combined);
        assert!("daily".parse::<ReportMode>().is_err());
    }
}
