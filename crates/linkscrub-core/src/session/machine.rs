//! The single-owner sanitization state machine.

use std::sync::Arc;
use std::time::Duration;

use crate::config::LinkscrubConfig;
use crate::host_prefs::PreferenceStore;
use crate::redirect::RedirectResolver;
use crate::url_model::{extract, sanitize_url, ExtractError, ParsedUrl, QueryParam, SchemePolicy};

use super::action::{Action, ButtonType, Effect, Message};
use super::params::ParameterMap;
use super::state::{Hint, SanitizeState};

/// External collaborators a session talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub prefs: Arc<dyn PreferenceStore>,
    pub resolver: Arc<dyn RedirectResolver>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub scheme_policy: SchemePolicy,
    /// Floor on how long a redirect lookup appears to take.
    pub min_resolve_duration: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            scheme_policy: SchemePolicy::ForceHttps,
            min_resolve_duration: Duration::from_millis(1000),
        }
    }
}

impl From<&LinkscrubConfig> for SessionOptions {
    fn from(cfg: &LinkscrubConfig) -> Self {
        Self {
            scheme_policy: cfg.scheme_policy(),
            min_resolve_duration: cfg.min_resolve_duration(),
        }
    }
}

/// A redirect lookup handed out by [`SanitizeSession::begin_redirect`]. It
/// owns everything it needs so it can run on another task.
pub struct PendingRedirect {
    url: ParsedUrl,
    resolver: Arc<dyn RedirectResolver>,
    min_duration: Duration,
}

impl PendingRedirect {
    pub fn url(&self) -> &ParsedUrl {
        &self.url
    }

    /// Resolve, padding the elapsed time up to the configured floor.
    pub async fn run(self) -> Option<ParsedUrl> {
        let start = tokio::time::Instant::now();
        let resolved = self.resolver.resolve(&self.url).await;
        let elapsed = start.elapsed();
        if elapsed < self.min_duration {
            let delay = self.min_duration - elapsed;
            tracing::debug!(?delay, "padding redirect lookup");
            tokio::time::sleep(delay).await;
        }
        resolved
    }
}

/// Owns one session's [`SanitizeState`] and applies actions to it one at a
/// time. Persistence happens only in [`flush`](Self::flush).
pub struct SanitizeSession {
    state: SanitizeState,
    collaborators: Collaborators,
    options: SessionOptions,
}

impl SanitizeSession {
    pub fn new(collaborators: Collaborators, options: SessionOptions) -> Self {
        Self {
            state: SanitizeState::default(),
            collaborators,
            options,
        }
    }

    pub fn state(&self) -> &SanitizeState {
        &self.state
    }

    /// Apply an action to completion, including any redirect lookup.
    pub async fn apply(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::IntentReceived { text, read_only } => {
                self.receive_intent(&text, read_only).await
            }
            Action::ParamToggled { param, keep } => {
                self.set_param(&param, keep);
                Vec::new()
            }
            Action::FetchRedirect => match self.begin_redirect() {
                Some(pending) => {
                    let resolved = pending.run().await;
                    self.finish_redirect(resolved).await
                }
                None => Vec::new(),
            },
            Action::ButtonTapped(kind) => self.button_tapped(kind),
            Action::Dismiss => vec![Effect::Finish],
        }
    }

    /// Start a session for `text`. A previously loaded URL is flushed first,
    /// since each inbound text is its own session.
    pub async fn receive_intent(&mut self, text: &str, read_only: bool) -> Vec<Effect> {
        let url = match extract(text, self.options.scheme_policy) {
            Ok(url) => url,
            Err(ExtractError::NotDetected) => {
                tracing::error!(text, "unable to detect URL in received text");
                return vec![Effect::ShowErrorAndFinish(Message::UrlNotDetected)];
            }
            Err(e) => {
                tracing::error!(error = %e, "unable to parse URL");
                return vec![Effect::ShowErrorAndFinish(Message::UnableToParse)];
            }
        };

        if self.state.original_url.is_some() {
            self.flush().await;
        }

        let parameters = self.build_parameters(&url).await;
        let sanitized_url = sanitize_url(&url, parameters.iter());
        self.state = SanitizeState {
            original_url: Some(url),
            parameters,
            sanitized_url,
            read_only,
            loading: false,
            hint: Hint::Default,
        };
        tracing::debug!(state = ?self.state, "intent processed");
        Vec::new()
    }

    /// Set the keep flag for `param`. Unknown keys are ignored; returns whether
    /// the key existed.
    pub fn set_param(&mut self, param: &QueryParam, keep: bool) -> bool {
        tracing::debug!(%param, keep, "param toggled");
        if !self.state.parameters.set(param, keep) {
            tracing::warn!(%param, "toggle for unknown parameter ignored");
            return false;
        }
        self.recompute();
        true
    }

    /// Flip the keep flag for `param`.
    pub fn toggle(&mut self, param: &QueryParam) -> bool {
        match self.state.parameters.get(param) {
            Some(keep) => self.set_param(param, !keep),
            None => false,
        }
    }

    /// Enter the resolving phase. Returns `None` (and changes nothing) when
    /// there is no URL or a lookup is already outstanding.
    pub fn begin_redirect(&mut self) -> Option<PendingRedirect> {
        let url = self.state.original_url.clone()?;
        if self.state.loading {
            tracing::debug!("redirect lookup already in progress; ignoring");
            return None;
        }
        self.state.loading = true;
        Some(PendingRedirect {
            url,
            resolver: Arc::clone(&self.collaborators.resolver),
            min_duration: self.options.min_resolve_duration,
        })
    }

    /// Apply the outcome of a lookup started by [`begin_redirect`](Self::begin_redirect).
    pub async fn finish_redirect(&mut self, resolved: Option<ParsedUrl>) -> Vec<Effect> {
        match resolved {
            Some(url) => {
                tracing::debug!(%url, "URL redirect detected");
                let parameters = self.build_parameters(&url).await;
                self.state.sanitized_url = sanitize_url(&url, parameters.iter());
                self.state.original_url = Some(url);
                self.state.parameters = parameters;
                self.state.hint = Hint::Default;
                self.state.loading = false;
                Vec::new()
            }
            None => {
                tracing::debug!("no redirect detected");
                self.state.hint = Hint::NoRedirectDetected;
                self.state.loading = false;
                vec![Effect::ShowToast(Message::RedirectNotDetected)]
            }
        }
    }

    /// Abandon an outstanding lookup started by
    /// [`begin_redirect`](Self::begin_redirect). URL, parameters and hint are
    /// left as they were.
    pub fn cancel_redirect(&mut self) {
        if self.state.loading {
            tracing::debug!("redirect lookup cancelled");
            self.state.loading = false;
        }
    }

    pub fn button_tapped(&self, kind: ButtonType) -> Vec<Effect> {
        tracing::debug!(?kind, "button tapped");
        if self.state.original_url.is_none() {
            tracing::warn!(?kind, "button tapped with no URL loaded; ignoring");
            return Vec::new();
        }
        let url = self.state.sanitized_url.clone();
        match kind {
            ButtonType::Copy => vec![Effect::CopyUrl(url), Effect::Finish],
            ButtonType::Open => vec![Effect::OpenUrl(url)],
            ButtonType::Share => vec![Effect::ShareUrl(url)],
            ButtonType::Return if self.state.read_only => {
                tracing::warn!("return requested for a read-only session; ignoring");
                Vec::new()
            }
            ButtonType::Return => vec![Effect::ReturnUrl(url)],
        }
    }

    /// Persist the names of every kept parameter for the current host.
    /// Failures are logged and otherwise ignored.
    pub async fn flush(&self) {
        let Some(host) = self.state.host() else {
            return;
        };
        let names = self.state.parameters.kept_names();
        tracing::debug!(host, ?names, "persisting enabled params");
        if let Err(e) = self
            .collaborators
            .prefs
            .set_enabled_params(host, &names)
            .await
        {
            tracing::warn!(host, "failed to persist enabled params: {e:#}");
        }
    }

    fn recompute(&mut self) {
        self.state.sanitized_url = match &self.state.original_url {
            Some(url) => sanitize_url(url, self.state.parameters.iter()),
            None => String::new(),
        };
    }

    /// Remembered names for the URL's host; read failures count as "nothing
    /// remembered".
    async fn build_parameters(&self, url: &ParsedUrl) -> ParameterMap {
        let kept = match self.collaborators.prefs.enabled_params(url.host()).await {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(host = url.host(), "failed to read enabled params: {e:#}");
                Vec::new()
            }
        };
        ParameterMap::from_url(url, &kept)
    }
}
