//! Per-host parameter preferences.
//!
//! For each hostname the store remembers which query parameter names the user
//! chose to keep. The engine reads this once per new URL and writes it back
//! once when a session ends; toggles never touch the store directly.

mod memory;
mod persist;
mod snapshot;

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use async_trait::async_trait;

pub use memory::MemoryPreferenceStore;
pub use persist::JsonPreferenceStore;
pub use snapshot::PersistedHostPrefs;

/// Backend for remembered "keep" decisions, keyed by hostname.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Names previously kept for `host`; empty if the host was never seen.
    async fn enabled_params(&self, host: &str) -> Result<Vec<String>>;

    /// Replace the remembered set for `host` wholesale.
    async fn set_enabled_params(&self, host: &str, params: &[String]) -> Result<()>;
}

/// In-memory host → kept-names table shared by the store implementations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostPrefs {
    hosts: BTreeMap<String, BTreeSet<String>>,
}

impl HostPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, host: &str) -> Vec<String> {
        self.hosts
            .get(host)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// An empty set removes the host entirely.
    pub fn set(&mut self, host: &str, params: &[String]) {
        if params.is_empty() {
            self.hosts.remove(host);
        } else {
            self.hosts
                .insert(host.to_string(), params.iter().cloned().collect());
        }
    }

    /// Returns true if the host had an entry.
    pub fn clear(&mut self, host: &str) -> bool {
        self.hosts.remove(host).is_some()
    }

    /// All hosts with their kept names, sorted by host.
    pub fn entries(&self) -> Vec<(String, Vec<String>)> {
        self.hosts
            .iter()
            .map(|(h, names)| (h.clone(), names.iter().cloned().collect()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
