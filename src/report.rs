//! Match results.
//!
//! A [`SourceReport`] is the finalized result of scanning one corpus source
//! (or several, merged) for one legitimate domain. Matches are kept in a
//! sorted map so reporting order is always lexicographic.

use std::collections::btree_map::{self, BTreeMap};

use serde::Serialize;

use crate::error::{Result, SquatError};
use crate::types::{Detector, LineDecodeWarning};

/// Cap on individually recorded decode warnings per report. Further
/// warnings are only counted.
pub const MAX_RECORDED_WARNINGS: usize = 64;

/// Counters collected while scanning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Lines read, including blank and undecodable ones
    pub lines: usize,
    /// Lines that were empty after trimming
    pub blank: usize,
    /// Lines skipped because they were not valid UTF-8
    pub decode_warnings: usize,
    /// First few decode warnings, for diagnostics
    pub warnings: Vec<LineDecodeWarning>,
    /// Lines flagged by exact variant membership
    pub variant_hits: usize,
    /// Lines flagged by brand patterns
    pub pattern_hits: usize,
    /// Lines flagged by edit distance
    pub distance_hits: usize,
}

impl ScanStats {
    pub(crate) fn record_hit(&mut self, detector: Detector) {
        match detector {
            Detector::Variant => self.variant_hits += 1,
            Detector::Pattern => self.pattern_hits += 1,
            Detector::Distance => self.distance_hits += 1,
        }
    }

    pub(crate) fn record_warning(&mut self, warning: LineDecodeWarning) {
        self.decode_warnings += 1;
        if self.warnings.len() < MAX_RECORDED_WARNINGS {
            self.warnings.push(warning);
        }
    }

    /// Number of hits attributed to `detector`.
    pub fn hits(&self, detector: Detector) -> usize {
        match detector {
            Detector::Variant => self.variant_hits,
            Detector::Pattern => self.pattern_hits,
            Detector::Distance => self.distance_hits,
        }
    }

    fn merge(&mut self, other: &ScanStats) {
        self.lines += other.lines;
        self.blank += other.blank;
        self.decode_warnings += other.decode_warnings;
        let room = MAX_RECORDED_WARNINGS.saturating_sub(self.warnings.len());
        self.warnings.extend(other.warnings.iter().take(room).cloned());
        self.variant_hits += other.variant_hits;
        self.pattern_hits += other.pattern_hits;
        self.distance_hits += other.distance_hits;
    }
}

/// What a caller shows for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Scan succeeded and nothing was flagged
    NoMatches,
    /// Flagged domains, sorted ascending
    Matches(Vec<String>),
}

/// Result of scanning one corpus source for one legitimate domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    /// Legitimate domain the scan was for
    pub domain: String,
    /// Corpus source name (or `combined`)
    pub source: String,
    /// Flagged domains and the detector that flagged each
    pub matches: BTreeMap<String, Detector>,
    /// Scan counters
    pub stats: ScanStats,
}

impl SourceReport {
    pub fn new(domain: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            source: source.into(),
            matches: BTreeMap::new(),
            stats: ScanStats::default(),
        }
    }

    /// Record a flagged candidate. A domain already present keeps the
    /// detector with the highest precedence.
    pub(crate) fn insert(&mut self, candidate: String, detector: Detector) {
        self.matches
            .entry(candidate)
            .and_modify(|existing| *existing = (*existing).min(detector))
            .or_insert(detector);
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether `domain` was flagged.
    pub fn contains(&self, domain: &str) -> bool {
        self.matches.contains_key(domain)
    }

    /// Detector that flagged `domain`, if it was flagged.
    pub fn detector_for(&self, domain: &str) -> Option<Detector> {
        self.matches.get(domain).copied()
    }

    /// Flagged domains in ascending order.
    pub fn domains(&self) -> Vec<String> {
        self.matches.keys().cloned().collect()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Detector> {
        self.matches.iter()
    }

    /// Empty-result signal or the sorted match list.
    pub fn outcome(&self) -> Outcome {
        if self.matches.is_empty() {
            Outcome::NoMatches
        } else {
            Outcome::Matches(self.domains())
        }
    }

    /// Union `other` into this report.
    pub fn merge(&mut self, other: SourceReport) {
        for (domain, detector) in other.matches {
            self.insert(domain, detector);
        }
        self.stats.merge(&other.stats);
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(SquatError::from)
    }
}

/// Per-source result of a multi-source scan. A failed source does not
/// prevent the others from being reported.
#[derive(Debug)]
pub struct SourceOutcome {
    /// Source name
    pub source: String,
    /// Report, or why this source could not be scanned
    pub result: Result<SourceReport>,
}

impl SourceOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn report(&self) -> Option<&SourceReport> {
        self.result.as_ref().ok()
    }
}
