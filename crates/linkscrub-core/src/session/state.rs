//! Observable session snapshot.

use crate::url_model::ParsedUrl;

use super::params::ParameterMap;

/// Advisory shown next to the result; never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hint {
    #[default]
    Default,
    NoRedirectDetected,
}

/// Coarse lifecycle position derived from the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No URL parsed yet.
    Idle,
    Ready,
    /// A redirect lookup is outstanding.
    Resolving,
}

/// Snapshot of one sanitization session.
///
/// `sanitized_url` is always recomputed from `original_url` and `parameters`;
/// with no URL, `parameters` is empty and `sanitized_url` is `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeState {
    pub original_url: Option<ParsedUrl>,
    pub parameters: ParameterMap,
    pub sanitized_url: String,
    /// When false the result may be handed back to the caller that shared it.
    pub read_only: bool,
    pub loading: bool,
    pub hint: Hint,
}

impl Default for SanitizeState {
    fn default() -> Self {
        Self {
            original_url: None,
            parameters: ParameterMap::new(),
            sanitized_url: String::new(),
            read_only: true,
            loading: false,
            hint: Hint::Default,
        }
    }
}

impl SanitizeState {
    pub fn phase(&self) -> Phase {
        match (&self.original_url, self.loading) {
            (None, _) => Phase::Idle,
            (Some(_), false) => Phase::Ready,
            (Some(_), true) => Phase::Resolving,
        }
    }

    pub fn host(&self) -> Option<&str> {
        self.original_url.as_ref().map(ParsedUrl::host)
    }
}
