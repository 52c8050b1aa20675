use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Result, SquatError};
use crate::types::LegitDomain;

/// Parse and validate an operator-supplied legitimate domain.
///
/// The input is trimmed and lowercased, then split on its last dot. Inputs
/// without a dot, or with nothing on either side of the last dot, are
/// rejected with [`SquatError::InvalidDomain`].
pub fn parse_domain(input: &str) -> Result<LegitDomain> {
    let domain = input.trim().to_lowercase();

    let (base, tld) = domain.rsplit_once('.').ok_or_else(|| {
        SquatError::InvalidDomain(format!("{} (example: microsoft.com)", input.trim()))
    })?;

    if tld.is_empty() {
        return Err(SquatError::InvalidDomain(format!(
            "{} has an empty top-level suffix",
            input.trim()
        )));
    }
    // An empty base would turn every brand pattern into a match-all.
    if base.is_empty() {
        return Err(SquatError::InvalidDomain(format!(
            "{} has an empty base label",
            input.trim()
        )));
    }
    if domain.chars().any(char::is_whitespace) {
        return Err(SquatError::InvalidDomain(format!(
            "{} contains whitespace",
            input.trim()
        )));
    }

    Ok(LegitDomain::from_parts(base, tld))
}

/// Parse a watch list of legitimate domains, one per line.
///
/// `#` starts a comment, blank lines are skipped and repeated domains are
/// kept once in first-seen order.
pub fn parse_watchlist(text: &str) -> Result<Vec<LegitDomain>> {
    let mut domains = Vec::new();
    let mut seen = HashSet::new();

    for (line_num, line) in text.lines().enumerate() {
        let line_num = line_num + 1;

        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let domain = parse_domain(line).map_err(|e| SquatError::ParseErrorAtLine {
            line: line_num,
            message: e.to_string(),
        })?;

        if seen.insert(domain.domain.clone()) {
            domains.push(domain);
        }
    }

    Ok(domains)
}

/// Parse a watch list from a file.
pub fn parse_watchlist_from_file(path: impl AsRef<Path>) -> Result<Vec<LegitDomain>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        SquatError::ConfigError(format!(
            "Failed to read watch list '{}': {}",
            path.display(),
            e
        ))
    })?;
    parse_watchlist(&text)
}
