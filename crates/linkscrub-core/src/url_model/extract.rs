//! Detection of the single most likely URL in free text.

use std::sync::OnceLock;

use regex::Regex;

use super::{ParsedUrl, SchemePolicy};

/// Why no URL could be produced from shared text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// Nothing URL-like was found.
    #[error("no URL detected in text")]
    NotDetected,
    /// A candidate was found but is not a well-formed http(s) URL.
    #[error("unable to parse URL: {candidate}")]
    Unparsable { candidate: String },
}

/// Either an explicit `scheme://...` run, or a bare `host.tld` with optional
/// port and path/query/fragment.
const URL_PATTERN: &str = concat!(
    r"(?i)\b[a-z][a-z0-9+.\-]*://[^\s<>\x22]+",
    r"|\b(?:[a-z0-9](?:[a-z0-9\-]*[a-z0-9])?\.)+[a-z]{2,63}(?::\d{1,5})?(?:[/?#][^\s<>\x22]*)?",
);

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(URL_PATTERN).expect("URL pattern should compile"))
}

/// Returns the longest URL-like substring of `text` (ties go to the first).
///
/// Shorter matches are usually truncated fragments of the real link, so the
/// longest one is taken as the intended URL.
pub fn extract_candidate(text: &str) -> Option<&str> {
    let mut best: Option<&str> = None;
    for m in url_regex().find_iter(text) {
        let candidate = trim_trailing(m.as_str());
        if candidate.is_empty() {
            continue;
        }
        if best.map_or(true, |b| candidate.len() > b.len()) {
            best = Some(candidate);
        }
    }
    best
}

/// Extracts and parses the most likely URL from `text`.
pub fn extract(text: &str, policy: SchemePolicy) -> Result<ParsedUrl, ExtractError> {
    let candidate = extract_candidate(text).ok_or(ExtractError::NotDetected)?;
    tracing::debug!(candidate, "URL candidate selected");
    ParsedUrl::parse(candidate, policy)
}

/// Strips sentence punctuation and unbalanced closing brackets that commonly
/// follow a pasted link.
fn trim_trailing(mut s: &str) -> &str {
    loop {
        let Some(last) = s.chars().last() else {
            return s;
        };
        let strip = match last {
            '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '*' => true,
            ')' => s.matches('(').count() < s.matches(')').count(),
            ']' => s.matches('[').count() < s.matches(']').count(),
            '}' => s.matches('{').count() < s.matches('}').count(),
            _ => false,
        };
        if !strip {
            return s;
        }
        s = &s[..s.len() - last.len_utf8()];
    }
}
