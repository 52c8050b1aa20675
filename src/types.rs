use std::fmt;

use serde::{Deserialize, Serialize};

/// A legitimate domain the operator wants to protect.
///
/// Always lowercased. Split on the *last* dot, so `mail.example.com` has
/// `base = "mail.example"` and `tld = "com"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LegitDomain {
    /// Full lowercased domain as supplied
    pub domain: String,
    /// Everything before the last dot
    pub base: String,
    /// Everything after the last dot
    pub tld: String,
}

impl LegitDomain {
    /// Build from already validated parts. Use [`crate::parse_domain`] for
    /// operator input.
    pub(crate) fn from_parts(base: &str, tld: &str) -> Self {
        Self {
            domain: format!("{}.{}", base, tld),
            base: base.to_string(),
            tld: tld.to_string(),
        }
    }

    /// Reassemble a mutated base with this domain's tld.
    pub fn with_base(&self, base: &str) -> String {
        format!("{}.{}", base, self.tld)
    }
}

impl fmt::Display for LegitDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.domain)
    }
}

/// Detector that flagged a candidate.
///
/// Variant order is evaluation precedence: exact variant membership first,
/// then brand patterns, then edit distance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Detector {
    Variant,
    Pattern,
    Distance,
}

impl Detector {
    pub const ALL: [Detector; 3] = [Detector::Variant, Detector::Pattern, Detector::Distance];

    pub fn as_str(&self) -> &'static str {
        match self {
            Detector::Variant => "variant",
            Detector::Pattern => "pattern",
            Detector::Distance => "distance",
        }
    }
}

impl fmt::Display for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A corpus line that was not valid UTF-8 and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDecodeWarning {
    /// 1-based line number within its source
    pub line_number: usize,
    /// Raw length of the undecodable line in bytes
    pub byte_len: usize,
}

/// Trim and lowercase a raw corpus line. Returns `None` for blank lines.
pub fn normalize_candidate(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Label of a candidate: everything before its first dot.
pub fn candidate_label(candidate: &str) -> &str {
    candidate.split('.').next().unwrap_or(candidate)
}
