use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Characters that would break a line-oriented hosts entry: `#` starts a
/// comment, control characters split or hide the line.
static FORBIDDEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#\p{Cc}]").expect("valid regex"));

/// A normalized host name as written into the hosts file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainName(String);

impl DomainName {
    /// Normalize one raw user-supplied entry.
    ///
    /// Returns `Ok(None)` when nothing usable is left (blank input, bare scheme).
    pub fn parse(raw: &str) -> Result<Option<Self>, DomainError> {
        let lowered = raw.trim().to_lowercase();
        let without_scheme = lowered
            .strip_prefix("https://")
            .or_else(|| lowered.strip_prefix("http://"))
            .unwrap_or(&lowered);
        let trimmed = without_scheme.trim_matches(|c| c == '/' || c == ' ');

        let Some(token) = trimmed.split_whitespace().next() else {
            return Ok(None);
        };

        if FORBIDDEN.is_match(token) {
            return Err(DomainError::InvalidDomain(raw.to_string()));
        }

        Ok(Some(Self(token.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DomainName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize a raw domain list, dropping empties and duplicates while
/// keeping first-seen order.
pub fn normalize_domains<S: AsRef<str>>(raw: &[S]) -> Result<Vec<DomainName>, DomainError> {
    let mut out: Vec<DomainName> = Vec::with_capacity(raw.len());
    for entry in raw {
        if let Some(domain) = DomainName::parse(entry.as_ref())? {
            if !out.contains(&domain) {
                out.push(domain);
            }
        }
    }
    Ok(out)
}
