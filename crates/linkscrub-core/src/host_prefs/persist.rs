//! Preferences persisted as JSON under the XDG state dir, so keep decisions
//! survive across runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::snapshot::PersistedHostPrefs;
use super::{HostPrefs, PreferenceStore};

/// File-backed store. Every call re-reads the file so several processes see
/// each other's writes; writes replace the file atomically.
#[derive(Debug)]
pub struct JsonPreferenceStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Default path for the preference file: `~/.local/state/linkscrub/host_prefs.json`.
    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("linkscrub")?;
        Ok(xdg_dirs
            .get_state_home()
            .join("linkscrub")
            .join("host_prefs.json"))
    }

    /// Store at the default path.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All remembered hosts with their kept names.
    pub async fn list_hosts(&self) -> Result<Vec<(String, Vec<String>)>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.entries())
    }

    /// Forget everything remembered for `host`. Returns true if it had an entry.
    pub async fn clear_host(&self, host: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut prefs = self.load().await?;
        let removed = prefs.clear(host);
        if removed {
            self.save(&prefs).await?;
        }
        Ok(removed)
    }

    /// Missing file is an empty table; a corrupt file is replaced by an empty
    /// table on the next write.
    async fn load(&self) -> Result<HostPrefs> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HostPrefs::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read host prefs: {}", self.path.display()))
            }
        };
        match serde_json::from_slice::<PersistedHostPrefs>(&bytes) {
            Ok(snapshot) => Ok(HostPrefs::from(snapshot)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "host prefs file is corrupt; starting empty"
                );
                Ok(HostPrefs::new())
            }
        }
    }

    async fn save(&self, prefs: &HostPrefs) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&PersistedHostPrefs::from(prefs))
            .context("serialize host prefs")?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("write host prefs: {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replace host prefs: {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for JsonPreferenceStore {
    async fn enabled_params(&self, host: &str) -> Result<Vec<String>> {
        let _guard = self.lock.lock().await;
        let params = self.load().await?.get(host);
        tracing::debug!(host, ?params, "retrieved enabled params");
        Ok(params)
    }

    async fn set_enabled_params(&self, host: &str, params: &[String]) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut prefs = self.load().await?;
        prefs.set(host, params);
        self.save(&prefs).await?;
        tracing::debug!(host, ?params, "persisted enabled params");
        Ok(())
    }
}
