//! URL modeling for sanitization.
//!
//! A [`ParsedUrl`] keeps exactly the pieces the sanitizer rebuilds from
//! (scheme, host, explicit port, encoded path) plus the query string split into
//! ordered `(name, value)` parameters. Fragments and userinfo are dropped at
//! parse time.

mod extract;
mod query;
mod sanitize;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use extract::{extract, extract_candidate, ExtractError};
pub use query::{encode_component, parse_query};
pub use sanitize::sanitize_url;

/// How the scheme of a detected URL is normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemePolicy {
    /// `http` and schemeless candidates become `https`.
    #[default]
    ForceHttps,
    /// Keep `http`/`https` as written; schemeless candidates get `http`.
    Preserve,
}

impl SchemePolicy {
    pub fn from_force_https(force_https: bool) -> Self {
        if force_https {
            SchemePolicy::ForceHttps
        } else {
            SchemePolicy::Preserve
        }
    }

    fn default_scheme(self) -> &'static str {
        match self {
            SchemePolicy::ForceHttps => "https",
            SchemePolicy::Preserve => "http",
        }
    }
}

/// A single query parameter. Identity is the `(name, value)` pair, so two
/// parameters sharing a name but not a value are tracked independently.
///
/// `value` is `None` for a bare flag (`?flag`) and `Some("")` for `?flag=`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryParam {
    pub name: String,
    pub value: Option<String>,
}

impl QueryParam {
    pub fn new(name: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            name: name.into(),
            value: value.map(str::to_string),
        }
    }
}

impl fmt::Display for QueryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{}={}", self.name, v),
            None => f.write_str(&self.name),
        }
    }
}

/// Immutable parsed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    scheme: String,
    host: String,
    port: Option<u16>,
    path: String,
    query: Vec<QueryParam>,
}

impl ParsedUrl {
    /// Parses an absolute http(s) URL, applying `policy` to its scheme.
    ///
    /// Input without `scheme://` is given the policy's default scheme. Any
    /// explicit scheme other than `http`/`https` is rejected.
    pub fn parse(input: &str, policy: SchemePolicy) -> Result<Self, ExtractError> {
        let unparsable = || ExtractError::Unparsable {
            candidate: input.to_string(),
        };

        let with_scheme = if has_explicit_scheme(input) {
            input.to_string()
        } else {
            format!("{}://{}", policy.default_scheme(), input)
        };

        let mut parsed = url::Url::parse(&with_scheme).map_err(|_| unparsable())?;
        match parsed.scheme() {
            "https" => {}
            "http" => {
                if policy == SchemePolicy::ForceHttps {
                    parsed.set_scheme("https").map_err(|_| unparsable())?;
                }
            }
            _ => return Err(unparsable()),
        }

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(unparsable)?
            .to_string();

        Ok(Self {
            scheme: parsed.scheme().to_string(),
            host,
            port: parsed.port(),
            path: parsed.path().to_string(),
            query: parsed.query().map(parse_query).unwrap_or_default(),
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicit, non-default port if the source carried one.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Path in its percent-encoded form.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters in order of appearance; duplicates are kept.
    pub fn query_params(&self) -> &[QueryParam] {
        &self.query
    }
}

/// Formats the URL with every query parameter kept.
impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let all = self.query.iter().map(|p| (p, true));
        f.write_str(&sanitize_url(self, all))
    }
}

fn has_explicit_scheme(input: &str) -> bool {
    match input.find("://") {
        Some(idx) if idx > 0 => {
            let scheme = &input[..idx];
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}
