use super::CandidateMatcher;
use crate::types::LegitDomain;
use crate::variant::{generate_variants, VariantSet, VariantTables};

/// Exact membership in the generated variant set.
#[derive(Debug, Clone)]
pub struct VariantMatcher {
    variants: VariantSet,
}

impl VariantMatcher {
    pub fn new(legit: &LegitDomain, tables: &VariantTables) -> Self {
        Self {
            variants: generate_variants(legit, tables),
        }
    }

    pub fn variants(&self) -> &VariantSet {
        &self.variants
    }
}

impl CandidateMatcher for VariantMatcher {
    fn matches(&self, candidate: &str) -> bool {
        // Variants are stored lowercased; only allocate when needed.
        if candidate.bytes().any(|b| b.is_ascii_uppercase()) {
            self.variants.contains(&candidate.to_lowercase())
        } else {
            self.variants.contains(candidate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_domain;

    #[test]
    fn test_exact_membership() {
        let legit = parse_domain("example.com").unwrap();
        let m = VariantMatcher::new(&legit, VariantTables::builtin());

        assert!(m.matches("example.com"));
        assert!(m.matches("exmaple.com"));
        assert!(m.matches("EXMAPLE.COM"));
        assert!(!m.matches("exmaple.net"));
        assert!(!m.matches("www.exmaple.com"));
        assert!(m.variants().len() > 20);
    }
}
