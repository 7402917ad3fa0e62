//! Short-link redirect resolution.
//!
//! The engine only depends on [`RedirectResolver`]. [`CurlRedirectResolver`]
//! is the network implementation: a single libcurl GET that follows redirects
//! and reports the effective URL.

mod probe;

use async_trait::async_trait;

use crate::config::ResolverConfig;
use crate::url_model::{ParsedUrl, SchemePolicy};

pub use probe::follow_redirects;

/// Resolves a URL to the destination of its redirect chain.
#[async_trait]
pub trait RedirectResolver: Send + Sync {
    /// Final URL if and only if it differs from `url`. Every failure (DNS,
    /// timeout, TLS, HTTP) is reported as `None`.
    async fn resolve(&self, url: &ParsedUrl) -> Option<ParsedUrl>;
}

/// Network resolver backed by libcurl.
#[derive(Debug, Clone)]
pub struct CurlRedirectResolver {
    config: ResolverConfig,
}

impl CurlRedirectResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl RedirectResolver for CurlRedirectResolver {
    async fn resolve(&self, url: &ParsedUrl) -> Option<ParsedUrl> {
        let target = url.to_string();
        let config = self.config.clone();
        // curl is blocking; keep it off the async workers.
        let outcome =
            tokio::task::spawn_blocking(move || follow_redirects(&target, &config)).await;

        match outcome {
            Ok(Ok(effective)) => changed_destination(url, &effective),
            Ok(Err(e)) => {
                tracing::debug!(url = %url, error = %format!("{e:#}"), "redirect probe failed");
                None
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "redirect probe task failed");
                None
            }
        }
    }
}

/// Parses `effective` and returns it only when it is a different URL.
pub fn changed_destination(original: &ParsedUrl, effective: &str) -> Option<ParsedUrl> {
    let resolved = match ParsedUrl::parse(effective, SchemePolicy::Preserve) {
        Ok(u) => u,
        Err(e) => {
            tracing::debug!(effective, error = %e, "redirect target is not a usable URL");
            return None;
        }
    };
    if &resolved == original {
        None
    } else {
        Some(resolved)
    }
}
