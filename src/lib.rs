//! Typosquat Engine - flags newly registered look-alike domains
//!
//! Given a legitimate domain and one or more lists of newly registered
//! domains, this library reports the candidates that plausibly impersonate
//! the legitimate one. Three detectors run per candidate, first hit wins:
//! - Exact membership in a generated variant set (deletion, duplication,
//!   transposition, homoglyph, dictionary suffix)
//! - Brand patterns: the base label embedded in a longer noisy string
//! - Edit distance: `0 < levenshtein(label, base) <= threshold`
//!
//! # Example
//!
//! ```rust
//! use typosquat_engine_r::{CancelToken, MemorySource, Outcome, QueryEngine, ScanOptions};
//!
//! let engine = QueryEngine::from_domain("google.com", ScanOptions::default()).unwrap();
//!
//! let day = MemorySource::from_lines(
//!     "2024-05-01",
//!     ["goggle.com", "google-login.com", "weather.org"],
//! );
//! let report = engine.scan_source(&day, &CancelToken::new()).unwrap();
//!
//! match report.outcome() {
//!     Outcome::NoMatches => println!("No suspicious domains found"),
//!     Outcome::Matches(domains) => {
//!         for domain in domains {
//!             println!("  - {}", domain);
//!         }
//!     }
//! }
//! ```
//!
//! # Domain Splitting
//!
//! A legitimate domain is split on its *last* dot: `mail.example.com` has
//! base `mail.example` and tld `com`. Candidates are compared on the label
//! before their *first* dot for edit distance, and as full strings for
//! variant membership and brand patterns.

pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod parser;
pub mod report;
pub mod types;
pub mod variant;

// Re-export commonly used items
pub use config::{ReportMode, ScanOptions, DEFAULT_THRESHOLD};
pub use corpus::{sources_from_dir, CorpusSource, FileSource, MemorySource};
pub use engine::{CancelToken, QueryEngine, COMBINED_SOURCE_NAME};
pub use error::{CorpusErrorKind, Result, SquatError};
pub use matcher::{
    levenshtein, CandidateMatcher, DistanceMatcher, Matcher, PatternSet, VariantMatcher,
};
pub use parser::{parse_domain, parse_watchlist, parse_watchlist_from_file};
pub use report::{Outcome, ScanStats, SourceOutcome, SourceReport};
pub use types::{Detector, LegitDomain, LineDecodeWarning};
pub use variant::{generate_variants, VariantSet, VariantTables};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_workflow() {
        let watchlist = r#"
# Brands to protect
example.com
microsoft.com
google.com
bank.com
"#;
        let domains = parse_watchlist(watchlist).unwrap();
        assert_eq!(domains.len(), 4);

        let corpus = MemorySource::from_lines(
            "2024-05-01",
            [
                "exmaple.com",
                "Microsoft-Login123.com",
                "goggle.com",
                "totally-unrelated.net",
                "",
            ],
        );

        let cancel = CancelToken::new();
        let mut flagged = Vec::new();
        for legit in &domains {
            let engine =
                QueryEngine::new(legit, VariantTables::builtin(), ScanOptions::default()).unwrap();
            let report = engine.scan_source(&corpus, &cancel).unwrap();
            flagged.push((legit.domain.clone(), report.outcome()));
        }

        assert_eq!(
            flagged[0],
            (
                "example.com".to_string(),
                Outcome::Matches(vec!["exmaple.com".to_string()])
            )
        );
        assert_eq!(
            flagged[1].1,
            Outcome::Matches(vec!["microsoft-login123.com".to_string()])
        );
        assert_eq!(
            flagged[2].1,
            Outcome::Matches(vec!["goggle.com".to_string()])
        );
        assert_eq!(flagged[3].1, Outcome::NoMatches);
    }
}
