use super::CandidateMatcher;
use crate::types::candidate_label;

/// Compute the Levenshtein edit distance between two strings.
///
/// Unit cost for insertion, deletion and substitution, counted over
/// characters. Uses two rows instead of the full matrix.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Flags candidates whose label is a near miss of the legitimate base:
/// `0 < distance <= threshold`. Distance 0 is the same name, not a typo.
#[derive(Debug, Clone)]
pub struct DistanceMatcher {
    base: String,
    base_len: usize,
    threshold: usize,
}

impl DistanceMatcher {
    pub fn new(base: &str, threshold: usize) -> Self {
        let base = base.to_lowercase();
        Self {
            base_len: base.chars().count(),
            base,
            threshold,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Edit distance between a label and the legitimate base.
    pub fn score(&self, label: &str) -> usize {
        levenshtein(label, &self.base)
    }

    /// Whether `label` is within the threshold without being identical.
    pub fn is_near_miss(&self, label: &str) -> bool {
        if self.threshold == 0 {
            return false;
        }
        // The length gap is a lower bound on the distance.
        if label.chars().count().abs_diff(self.base_len) > self.threshold {
            return false;
        }
        let distance = self.score(label);
        distance > 0 && distance <= self.threshold
    }
}

impl CandidateMatcher for DistanceMatcher {
    fn matches(&self, candidate: &str) -> bool {
        self.is_near_miss(&candidate_label(candidate).to_lowercase())
    }
}
