//! Typosquat variant generation.
//!
//! Produces the set of look-alike domains derived from a legitimate domain:
//! character deletion, duplication, adjacent transposition, homoglyph
//! substitution and dictionary-word concatenation. The tables driving
//! substitution and concatenation live in [`VariantTables`] and are passed in
//! by reference so generation stays a pure function.

use std::collections::hash_set;
use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use crate::types::LegitDomain;

static BUILTIN_TABLES: Lazy<VariantTables> = Lazy::new(VariantTables::default);

/// Homoglyph and dictionary tables used by [`generate_variants`].
#[derive(Debug, Clone)]
pub struct VariantTables {
    homoglyphs: HashMap<char, Vec<String>>,
    dictionary: Vec<String>,
}

impl VariantTables {
    /// Empty tables: only deletion, duplication and transposition apply.
    pub fn empty() -> Self {
        Self {
            homoglyphs: HashMap::new(),
            dictionary: Vec::new(),
        }
    }

    /// Shared instance of the built-in tables, initialized on first use.
    pub fn builtin() -> &'static VariantTables {
        &BUILTIN_TABLES
    }

    /// Register alternative glyphs for a character.
    ///
    /// Alternatives may be longer than one character (`m` -> `rn`).
    pub fn with_homoglyph<I, S>(mut self, ch: char, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.homoglyphs.entry(ch.to_ascii_lowercase()).or_default();
        for alt in alternatives {
            let alt = alt.into().to_lowercase();
            if !alt.is_empty() && !entry.contains(&alt) {
                entry.push(alt);
            }
        }
        self
    }

    /// Add a word used for `base-word.tld` and `baseword.tld` variants.
    pub fn with_dictionary_word(mut self, word: impl Into<String>) -> Self {
        let word = word.into().trim().to_lowercase();
        if !word.is_empty() && !self.dictionary.contains(&word) {
            self.dictionary.push(word);
        }
        self
    }

    /// Alternatives registered for `ch`, if any.
    pub fn homoglyphs_for(&self, ch: char) -> Option<&[String]> {
        self.homoglyphs.get(&ch).map(Vec::as_slice)
    }

    pub fn dictionary(&self) -> &[String] {
        &self.dictionary
    }
}

impl Default for VariantTables {
    fn default() -> Self {
        Self::empty()
            .with_homoglyph('a', ["@", "4"])
            .with_homoglyph('e', ["3"])
            .with_homoglyph('i', ["1", "l"])
            .with_homoglyph('o', ["0"])
            .with_homoglyph('s', ["5", "$"])
            .with_homoglyph('l', ["1", "i"])
            .with_homoglyph('m', ["rn"])
            .with_homoglyph('c', ["k"])
            .with_dictionary_word("login")
            .with_dictionary_word("verify")
            .with_dictionary_word("update")
            .with_dictionary_word("secure")
    }
}

/// Deduplicated set of look-alike domains for one legitimate domain.
#[derive(Debug, Clone, Default)]
pub struct VariantSet {
    domains: HashSet<String>,
}

impl VariantSet {
    /// Check if `domain` is one of the variants.
    /// Assumes `domain` is already lowercased.
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, String> {
        self.domains.iter()
    }

    fn insert(&mut self, domain: String) {
        self.domains.insert(domain);
    }
}

impl<'a> IntoIterator for &'a VariantSet {
    type Item = &'a String;
    type IntoIter = hash_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Generate the variant set for `legit`.
///
/// The result always contains `legit.domain` itself so an exact
/// re-registration is flagged.
pub fn generate_variants(legit: &LegitDomain, tables: &VariantTables) -> VariantSet {
    let mut set = VariantSet::default();
    set.insert(legit.domain.clone());

    let chars: Vec<char> = legit.base.chars().collect();
    let n = chars.len();

    for i in 0..n {
        // Deletion
        let deleted: String = chars[..i].iter().chain(&chars[i + 1..]).collect();
        set.insert(legit.with_base(&deleted));

        // Duplication
        let duplicated: String = chars[..=i].iter().chain(&chars[i..]).collect();
        set.insert(legit.with_base(&duplicated));
    }

    for i in 0..n.saturating_sub(1) {
        let mut swapped = chars.clone();
        swapped.swap(i, i + 1);
        set.insert(legit.with_base(&swapped.iter().collect::<String>()));
    }

    for (i, ch) in chars.iter().enumerate() {
        let Some(alternatives) = tables.homoglyphs_for(*ch) else {
            continue;
        };
        let prefix: String = chars[..i].iter().collect();
        let suffix: String = chars[i + 1..].iter().collect();
        for alt in alternatives {
            set.insert(legit.with_base(&format!("{}{}{}", prefix, alt, suffix)));
        }
    }

    for word in tables.dictionary() {
        set.insert(legit.with_base(&format!("{}-{}", legit.base, word)));
        set.insert(legit.with_base(&format!("{}{}", legit.base, word)));
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_domain;

    fn variants(domain: &str) -> VariantSet {
        generate_variants(&parse_domain(domain).unwrap(), VariantTables::builtin())
    }

    #[test]
    fn test_contains_original() {
        for domain in ["example.com", "a.io", "mail.example.com", "x1.net"] {
            assert!(variants(domain).contains(domain), "{domain} missing");
        }
    }

    #[test]
    fn test_deletion_and_duplication() {
        let set = variants("bank.com");
        assert!(set.contains("ank.com"));
        assert!(set.contains("bnk.com"));
        assert!(set.contains("ban.com"));
        assert!(set.contains("bbank.com"));
        assert!(set.contains("baank.com"));
        assert!(set.contains("bankk.com"));
    }

    #[test]
    fn test_transposition() {
        let set = variants("example.com");
        assert!(set.contains("exmaple.com"));
        assert!(set.contains("xeample.com"));
        assert!(set.contains("exampel.com"));
    }

    #[test]
    fn test_homoglyph_substitution() {
        let set = variants("microsoft.com");
        assert!(set.contains("rnicrosoft.com"));
        assert!(set.contains("m1crosoft.com"));
        assert!(set.contains("mlcrosoft.com"));
        assert!(set.contains("mikrosoft.com"));
        assert!(set.contains("micr0soft.com"));
        assert!(set.contains("microsoft.com"));
        assert!(set.contains("micro5oft.com"));
        assert!(set.contains("micro$oft.com"));
        // One position at a time, never all at once
        assert!(!set.contains("rn1kr050ft.com"));
    }

    #[test]
    fn test_dictionary_concatenation() {
        let set = variants("paypal.com");
        for word in ["login", "verify", "update", "secure"] {
            assert!(set.contains(&format!("paypal-{word}.com")));
            assert!(set.contains(&format!("paypal{word}.com")));
        }
    }

    #[test]
    fn test_exact_size_without_collisions() {
        // "xyz" has no homoglyphs and no repeated characters:
        // 1 original + 3 deletions + 3 duplications + 2 transpositions + 8 dictionary
        assert_eq!(variants("xyz.com").len(), 17);
    }

    #[test]
    fn test_duplicates_collapse() {
        // "aa": deleting either 'a' gives "a"; duplicating either gives "aaa";
        // swapping gives "aa" (the original).
        let legit = parse_domain("aa.com").unwrap();
        let set = generate_variants(&legit, &VariantTables::empty());
        let mut all: Vec<&String> = set.iter().collect();
        all.sort();
        assert_eq!(all, vec!["a.com", "aa.com", "aaa.com"]);
    }

    #[test]
    fn test_edit_variants_keep_tld_and_length() {
        let legit = parse_domain("secure-bank.org").unwrap();
        let set = generate_variants(&legit, &VariantTables::empty());
        let n = legit.base.chars().count();
        for v in &set {
            let (base, tld) = v.rsplit_once('.').unwrap();
            assert_eq!(tld, "org");
            let len = base.chars().count();
            assert!(len + 1 >= n && len <= n + 1, "{v} changed length too much");
        }
    }

    #[test]
    fn test_multi_label_base_variants() {
        let set = variants("mail.example.com");
        assert!(set.contains("mailexample.com"));
        assert!(set.contains("mail.exmaple.com"));
        assert!(set.contains("mail.example-login.com"));
    }

    #[test]
    fn test_custom_tables() {
        let tables = VariantTables::empty()
            .with_homoglyph('G', ["9", "q"])
            .with_dictionary_word(" Support ")
            .with_dictionary_word("support");
        assert_eq!(tables.dictionary(), &["support".to_string()]);

        let legit = parse_domain("google.com").unwrap();
        let set = generate_variants(&legit, &tables);
        assert!(set.contains("9oogle.com"));
        assert!(set.contains("qoogle.com"));
        assert!(set.contains("gooqle.com"));
        assert!(set.contains("goo9le.com"));
        assert!(set.contains("google-support.com"));
        assert!(!set.contains("google-login.com"));
    }

    #[test]
    fn test_non_ascii_base_does_not_panic() {
        let set = variants("münchen.de");
        assert!(set.contains("mnchen.de"));
        assert!(set.contains("mnüchen.de"));
        assert!(set.contains("müünchen.de"));
    }

    #[test]
    fn test_deterministic() {
        let mut a: Vec<String> = variants("google.com").iter().cloned().collect();
        let mut b: Vec<String> = variants("google.com").iter().cloned().collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }
}
