use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::url_model::SchemePolicy;

/// Network settings for redirect resolution (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Total request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum number of redirects followed before giving up.
    pub max_redirects: u32,
    /// `User-Agent` header sent with the request.
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            timeout_secs: 10,
            max_redirects: 10,
            user_agent: format!("linkscrub/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Global configuration loaded from `~/.config/linkscrub/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkscrubConfig {
    /// Upgrade `http` and schemeless links to `https`.
    pub force_https: bool,
    /// Minimum time a redirect lookup takes, so a fast failure does not just
    /// flash the loading indicator.
    pub min_resolve_duration_ms: u64,
    /// Override for the preference file; defaults to the XDG state dir.
    #[serde(default)]
    pub prefs_path: Option<PathBuf>,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

impl Default for LinkscrubConfig {
    fn default() -> Self {
        Self {
            force_https: true,
            min_resolve_duration_ms: 1000,
            prefs_path: None,
            resolver: ResolverConfig::default(),
        }
    }
}

impl LinkscrubConfig {
    pub fn scheme_policy(&self) -> SchemePolicy {
        SchemePolicy::from_force_https(self.force_https)
    }

    pub fn min_resolve_duration(&self) -> Duration {
        Duration::from_millis(self.min_resolve_duration_ms)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("linkscrub")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LinkscrubConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = LinkscrubConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: LinkscrubConfig = toml::from_str(&data)?;
    Ok(cfg)
}
