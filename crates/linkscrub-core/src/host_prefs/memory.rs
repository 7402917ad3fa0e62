//! Process-local preference store.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{HostPrefs, PreferenceStore};

/// Keeps preferences in memory only; contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    prefs: RwLock<HostPrefs>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefs(prefs: HostPrefs) -> Self {
        Self {
            prefs: RwLock::new(prefs),
        }
    }

    /// Copy of the current table.
    pub async fn snapshot(&self) -> HostPrefs {
        self.prefs.read().await.clone()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn enabled_params(&self, host: &str) -> Result<Vec<String>> {
        Ok(self.prefs.read().await.get(host))
    }

    async fn set_enabled_params(&self, host: &str, params: &[String]) -> Result<()> {
        self.prefs.write().await.set(host, params);
        Ok(())
    }
}
