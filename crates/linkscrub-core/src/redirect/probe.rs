//! Blocking libcurl probe that follows a redirect chain.

use anyhow::{Context, Result};
use std::time::Duration;

use crate::config::ResolverConfig;

/// Performs a GET on `url`, following redirects, and returns the effective URL.
///
/// The response body is discarded. Runs in the current thread; call from
/// `spawn_blocking` if used from async code.
pub fn follow_redirects(url: &str, config: &ResolverConfig) -> Result<String> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(config.max_redirects)?;
    easy.connect_timeout(Duration::from_secs(config.connect_timeout_secs))?;
    easy.timeout(Duration::from_secs(config.timeout_secs))?;
    easy.useragent(&config.user_agent)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| Ok(data.len()))?;
        transfer.perform().context("redirect request failed")?;
    }

    let code = easy.response_code().context("no response code")?;
    tracing::debug!(url, code, "redirect probe finished");

    let effective = easy
        .effective_url()
        .context("read effective URL")?
        .ok_or_else(|| anyhow::anyhow!("no effective URL for {url}"))?;
    Ok(effective.to_string())
}
