use std::io::BufRead;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::{ReportMode, ScanOptions};
use crate::corpus::{sources_from_dir, CorpusSource};
use crate::error::{CorpusErrorKind, Result, SquatError};
use crate::matcher::{CandidateMatcher, DistanceMatcher, Matcher, PatternSet, VariantMatcher};
use crate::parser::parse_domain;
use crate::report::{SourceOutcome, SourceReport};
use crate::types::{normalize_candidate, Detector, LegitDomain, LineDecodeWarning};
use crate::variant::VariantTables;

/// Report name used for merged results in [`ReportMode::Combined`]
pub const COMBINED_SOURCE_NAME: &str = "combined";

/// Cooperative cancellation flag, checked once per corpus line.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every scan holding a clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Detectors compiled for one legitimate domain.
///
/// Built once per query, then used to classify any number of candidates.
/// Matchers are tried in precedence order and the first hit wins.
pub struct QueryEngine {
    legit: LegitDomain,
    matchers: Vec<Matcher>,
    options: ScanOptions,
    cache: Option<Mutex<LruCache<String, Option<Detector>>>>,
}

impl QueryEngine {
    /// Compile detectors for `legit`.
    pub fn new(legit: &LegitDomain, tables: &VariantTables, options: ScanOptions) -> Result<Self> {
        let variants = VariantMatcher::new(legit, tables);
        let patterns = PatternSet::new(&legit.base)?;
        let distance = DistanceMatcher::new(&legit.base, options.threshold);

        debug!(
            domain = %legit,
            variants = variants.variants().len(),
            patterns = patterns.len(),
            threshold = options.threshold,
            "compiled query"
        );

        let cache = NonZeroUsize::new(options.cache_size).map(|n| Mutex::new(LruCache::new(n)));

        Ok(Self {
            legit: legit.clone(),
            matchers: vec![
                Matcher::Variant(variants),
                Matcher::Pattern(patterns),
                Matcher::Distance(distance),
            ],
            options,
            cache,
        })
    }

    /// Parse `domain` and compile it with the built-in variant tables.
    pub fn from_domain(domain: &str, options: ScanOptions) -> Result<Self> {
        let legit = parse_domain(domain)?;
        Self::new(&legit, VariantTables::builtin(), options)
    }

    pub fn legit(&self) -> &LegitDomain {
        &self.legit
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Number of generated variants, including the domain itself.
    pub fn variant_count(&self) -> usize {
        self.matchers
            .iter()
            .find_map(|m| match m {
                Matcher::Variant(v) => Some(v.variants().len()),
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Classify one raw corpus line. Blank lines are never flagged.
    pub fn classify(&self, raw: &str) -> Option<Detector> {
        let candidate = normalize_candidate(raw)?;
        self.classify_normalized(&candidate)
    }

    /// Run every detector on one raw line, for diagnostics. The first entry
    /// is the detector [`classify`](Self::classify) would report.
    pub fn explain(&self, raw: &str) -> Vec<Detector> {
        let Some(candidate) = normalize_candidate(raw) else {
            return Vec::new();
        };
        self.matchers
            .iter()
            .filter(|m| m.matches(&candidate))
            .map(Matcher::detector)
            .collect()
    }

    fn classify_normalized(&self, candidate: &str) -> Option<Detector> {
        let Some(cache) = &self.cache else {
            return self.find_match(candidate);
        };

        if let Some(cached) = cache.lock().get(candidate) {
            return *cached;
        }

        // Computed outside the lock so parallel workers do not serialize on
        // it. Two workers may both compute the same verdict.
        let result = self.find_match(candidate);
        cache.lock().put(candidate.to_string(), result);
        result
    }

    /// Find the first firing detector without caching
    fn find_match(&self, candidate: &str) -> Option<Detector> {
        self.matchers
            .iter()
            .find(|m| m.matches(candidate))
            .map(Matcher::detector)
    }

    /// Clear the verdict cache
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
    }

    /// Scan one corpus source.
    ///
    /// Undecodable lines are skipped and counted. Failing to open the source,
    /// a read error part-way through, or cancellation aborts this source only.
    pub fn scan_source(
        &self,
        source: &dyn CorpusSource,
        cancel: &CancelToken,
    ) -> Result<SourceReport> {
        let name = source.name();
        if cancel.is_cancelled() {
            return Err(SquatError::Cancelled {
                source_name: name.to_string(),
            });
        }

        let mut reader = source.open()?;
        let mut report = SourceReport::new(&self.legit.domain, name);
        let mut buf = Vec::new();
        let mut line_number = 0usize;

        loop {
            if cancel.is_cancelled() {
                return Err(SquatError::Cancelled {
                    source_name: name.to_string(),
                });
            }

            buf.clear();
            let read = reader.read_until(b'\n', &mut buf).map_err(|e| {
                SquatError::corpus(
                    CorpusErrorKind::ReadFailed,
                    name,
                    format!("read failed after line {}: {}", line_number, e),
                )
            })?;
            if read == 0 {
                break;
            }
            line_number += 1;
            report.stats.lines += 1;

            let text = match std::str::from_utf8(&buf) {
                Ok(text) => text,
                Err(_) => {
                    warn!(source = name, line = line_number, "skipping undecodable line");
                    report.stats.record_warning(LineDecodeWarning {
                        line_number,
                        byte_len: buf.len(),
                    });
                    continue;
                }
            };

            let Some(candidate) = normalize_candidate(text) else {
                report.stats.blank += 1;
                continue;
            };

            if let Some(detector) = self.classify_normalized(&candidate) {
                report.stats.record_hit(detector);
                report.insert(candidate, detector);
            }
        }

        info!(
            domain = %self.legit,
            source = name,
            lines = report.stats.lines,
            matches = report.len(),
            decode_warnings = report.stats.decode_warnings,
            "scanned corpus source"
        );

        Ok(report)
    }

    /// Scan several independent sources.
    ///
    /// A failing source is reported in its own [`SourceOutcome`] and never
    /// stops the others. With [`ReportMode::Combined`] the successful
    /// reports are merged into one outcome named [`COMBINED_SOURCE_NAME`],
    /// followed by the failed sources.
    pub fn scan_all(
        &self,
        sources: &[&dyn CorpusSource],
        cancel: &CancelToken,
    ) -> Vec<SourceOutcome> {
        let outcomes = if self.options.parallel && sources.len() > 1 {
            self.scan_parallel(sources, cancel)
        } else {
            sources
                .iter()
                .map(|source| self.scan_outcome(*source, cancel))
                .collect()
        };

        match self.options.report_mode {
            ReportMode::PerSource => outcomes,
            ReportMode::Combined => self.combine(outcomes),
        }
    }

    /// Scan every `*.txt` file in `dir` as its own source.
    pub fn scan_dir(
        &self,
        dir: impl AsRef<Path>,
        cancel: &CancelToken,
    ) -> Result<Vec<SourceOutcome>> {
        let files = sources_from_dir(dir)?;
        let sources: Vec<&dyn CorpusSource> =
            files.iter().map(|f| f as &dyn CorpusSource).collect();
        Ok(self.scan_all(&sources, cancel))
    }

    fn scan_outcome(&self, source: &dyn CorpusSource, cancel: &CancelToken) -> SourceOutcome {
        let result = self.scan_source(source, cancel);
        if let Err(ref e) = result {
            warn!(source = source.name(), error = %e, "corpus source failed");
        }
        SourceOutcome {
            source: source.name().to_string(),
            result,
        }
    }

    /// One scoped worker per source, each owning its partial report.
    fn scan_parallel(
        &self,
        sources: &[&dyn CorpusSource],
        cancel: &CancelToken,
    ) -> Vec<SourceOutcome> {
        thread::scope(|scope| {
            let handles: Vec<_> = sources
                .iter()
                .map(|source| {
                    let source = *source;
                    scope.spawn(move || self.scan_outcome(source, cancel))
                })
                .collect();

            handles
                .into_iter()
                .zip(sources)
                .map(|(handle, source)| {
                    handle.join().unwrap_or_else(|_| SourceOutcome {
                        source: source.name().to_string(),
                        result: Err(SquatError::WorkerPanicked {
                            source_name: source.name().to_string(),
                        }),
                    })
                })
                .collect()
        })
    }

    fn combine(&self, outcomes: Vec<SourceOutcome>) -> Vec<SourceOutcome> {
        let mut combined = SourceReport::new(&self.legit.domain, COMBINED_SOURCE_NAME);
        let mut failed = Vec::new();

        for outcome in outcomes {
            match outcome.result {
                Ok(report) => combined.merge(report),
                Err(_) => failed.push(outcome),
            }
        }

        let mut result = Vec::with_capacity(failed.len() + 1);
        result.push(SourceOutcome {
            source: COMBINED_SOURCE_NAME.to_string(),
            result: Ok(combined),
        });
        result.extend(failed);
        result
    }
}
