mod distance;
mod pattern;
mod variant_set;

pub use distance::{levenshtein, DistanceMatcher};
pub use pattern::PatternSet;
pub use variant_set::VariantMatcher;

use crate::types::Detector;

/// Trait for candidate matchers
pub trait CandidateMatcher: Send + Sync {
    /// Check if the normalized candidate domain matches this matcher
    fn matches(&self, candidate: &str) -> bool;
}

/// Enum wrapper for all matcher types
#[derive(Debug)]
pub enum Matcher {
    Variant(VariantMatcher),
    Pattern(PatternSet),
    Distance(DistanceMatcher),
}

impl Matcher {
    /// Detector reported when this matcher fires
    pub fn detector(&self) -> Detector {
        match self {
            Matcher::Variant(_) => Detector::Variant,
            Matcher::Pattern(_) => Detector::Pattern,
            Matcher::Distance(_) => Detector::Distance,
        }
    }
}

impl CandidateMatcher for Matcher {
    fn matches(&self, candidate: &str) -> bool {
        match self {
            Matcher::Variant(m) => m.matches(candidate),
            Matcher::Pattern(m) => m.matches(candidate),
            Matcher::Distance(m) => m.matches(candidate),
        }
    }
}
