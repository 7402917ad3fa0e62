//! Ordered parameter → keep-flag mapping.

use crate::url_model::{ParsedUrl, QueryParam};

/// Keep flags for the parameters of one URL, in order of first appearance.
///
/// Keys are fixed when the map is built from a URL: flipping a flag never adds
/// or removes entries, and the order is preserved across changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMap {
    entries: Vec<(QueryParam, bool)>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// One entry per distinct `(name, value)` pair of `url`; flagged when the
    /// name is in `kept_names`.
    pub fn from_url(url: &ParsedUrl, kept_names: &[String]) -> Self {
        let mut map = Self::new();
        for param in url.query_params() {
            if map.get(param).is_some() {
                continue;
            }
            let keep = kept_names.iter().any(|n| n == &param.name);
            map.entries.push((param.clone(), keep));
        }
        map
    }

    pub fn get(&self, param: &QueryParam) -> Option<bool> {
        self.entries
            .iter()
            .find(|(p, _)| p == param)
            .map(|(_, keep)| *keep)
    }

    /// Sets the flag for an existing key. Returns false if `param` is unknown.
    pub fn set(&mut self, param: &QueryParam, keep: bool) -> bool {
        match self.entries.iter_mut().find(|(p, _)| p == param) {
            Some(entry) => {
                entry.1 = keep;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QueryParam, bool)> + '_ {
        self.entries.iter().map(|(p, keep)| (p, *keep))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct names of kept parameters, in map order.
    pub fn kept_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for (param, keep) in self.iter() {
            if keep && !names.contains(&param.name) {
                names.push(param.name.clone());
            }
        }
        names
    }
}
