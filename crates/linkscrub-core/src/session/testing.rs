//! Deterministic collaborators for session and engine tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Notify;

use crate::host_prefs::{MemoryPreferenceStore, PreferenceStore};
use crate::redirect::RedirectResolver;
use crate::url_model::{ParsedUrl, SchemePolicy};

use super::{Collaborators, SanitizeSession, SessionOptions};

pub(crate) fn url(s: &str) -> ParsedUrl {
    ParsedUrl::parse(s, SchemePolicy::ForceHttps).unwrap()
}

/// Answers every lookup with the same target, optionally waiting for
/// [`release`](Self::release) first.
pub(crate) struct ScriptedResolver {
    target: Option<ParsedUrl>,
    gate: Option<Notify>,
    calls: AtomicUsize,
}

impl ScriptedResolver {
    pub(crate) fn returning(target: Option<&str>) -> Self {
        Self {
            target: target.map(url),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn gated(target: Option<&str>) -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::returning(target)
        }
    }

    pub(crate) fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RedirectResolver for ScriptedResolver {
    async fn resolve(&self, _url: &ParsedUrl) -> Option<ParsedUrl> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.target.clone()
    }
}

/// Store whose every call fails.
pub(crate) struct BrokenStore;

#[async_trait]
impl PreferenceStore for BrokenStore {
    async fn enabled_params(&self, _host: &str) -> Result<Vec<String>> {
        anyhow::bail!("disk on fire")
    }

    async fn set_enabled_params(&self, _host: &str, _params: &[String]) -> Result<()> {
        anyhow::bail!("disk on fire")
    }
}

pub(crate) fn options() -> SessionOptions {
    SessionOptions {
        scheme_policy: SchemePolicy::ForceHttps,
        min_resolve_duration: Duration::ZERO,
    }
}

pub(crate) fn session(
    prefs: Arc<MemoryPreferenceStore>,
    resolver: Arc<ScriptedResolver>,
) -> SanitizeSession {
    SanitizeSession::new(Collaborators { prefs, resolver }, options())
}
