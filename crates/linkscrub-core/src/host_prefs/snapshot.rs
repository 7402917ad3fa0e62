//! Serializable form of [`HostPrefs`] for the JSON preference file.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::HostPrefs;

/// On-disk document: `{"version":1,"hosts":{"<host>":["name", ...]}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedHostPrefs {
    #[serde(default = "default_version")]
    pub version: u8,
    #[serde(default)]
    pub hosts: BTreeMap<String, BTreeSet<String>>,
}

fn default_version() -> u8 {
    1
}

impl From<&HostPrefs> for PersistedHostPrefs {
    fn from(prefs: &HostPrefs) -> Self {
        Self {
            version: 1,
            hosts: prefs.hosts.clone(),
        }
    }
}

impl From<PersistedHostPrefs> for HostPrefs {
    fn from(snapshot: PersistedHostPrefs) -> Self {
        let hosts = snapshot
            .hosts
            .into_iter()
            .filter(|(host, names)| !host.is_empty() && !names.is_empty())
            .collect();
        HostPrefs { hosts }
    }
}
