use regex::{Regex, RegexBuilder};

use super::CandidateMatcher;
use crate::error::Result;

/// Brand-embedding patterns built from the legitimate base label.
///
/// Three progressively looser shapes, all anchored on the literal base and
/// searched anywhere in the candidate:
/// - `base-?[a-z0-9]*` (e.g. `microsoft-login123`)
/// - `base[a-z0-9]*-?[a-z0-9]*` (e.g. `microsoft123-login`)
/// - `[a-z0-9]*base[a-z0-9]*` (e.g. `123microsoft456`)
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// Compile the pattern set for `base`. The base is escaped, so a dot in a
    /// multi-label base only matches a literal dot.
    pub fn new(base: &str) -> Result<Self> {
        let base = regex::escape(&base.to_lowercase());
        let sources = [
            format!("{base}-?[a-z0-9]*"),
            format!("{base}[a-z0-9]*-?[a-z0-9]*"),
            format!("[a-z0-9]*{base}[a-z0-9]*"),
        ];

        let patterns = sources
            .iter()
            .map(|src| RegexBuilder::new(src).case_insensitive(true).build())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Compiled patterns in their fixed order.
    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Index of the first pattern found in `candidate`.
    pub fn first_match(&self, candidate: &str) -> Option<usize> {
        self.patterns.iter().position(|p| p.is_match(candidate))
    }
}

impl CandidateMatcher for PatternSet {
    fn matches(&self, candidate: &str) -> bool {
        self.first_match(candidate).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_patterns_in_order() {
        let set = PatternSet::new("microsoft").unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.patterns()[0].as_str(), "microsoft-?[a-z0-9]*");
        assert_eq!(set.patterns()[2].as_str(), "[a-z0-9]*microsoft[a-z0-9]*");
    }

    #[test]
    fn test_brand_with_suffix_noise() {
        let set = PatternSet::new("microsoft").unwrap();
        assert!(set.matches("microsoft-login123.com"));
        assert_eq!(set.first_match("microsoft-login123.com"), Some(0));
        assert!(set.matches("microsoft123-login.net"));
        assert!(set.matches("123microsoft456.org"));
        assert!(set.matches("login.microsoft.com"));
    }

    #[test]
    fn test_case_insensitive() {
        let set = PatternSet::new("PayPal").unwrap();
        assert!(set.matches("PAYPAL-secure.com"));
        assert!(set.matches("my-paypal.com"));
    }

    #[test]
    fn test_no_match_without_brand() {
        let set = PatternSet::new("google").unwrap();
        assert!(!set.matches("goggle.com"));
        assert!(!set.matches("g00gle.com"));
        assert!(!set.matches("totally-unrelated.net"));
        assert!(set.first_match("goog.le").is_none());
    }

    #[test]
    fn test_base_is_escaped() {
        let set = PatternSet::new("mail.example").unwrap();
        assert!(set.matches("mail.example-login.com"));
        assert!(!set.matches("mailxexample.com"));
    }
}
