//! Scenario tests for the session state machine.

use std::sync::Arc;
use std::time::Duration;

use crate::host_prefs::{HostPrefs, MemoryPreferenceStore, PreferenceStore};
use crate::url_model::QueryParam;

use super::testing::{options, session, url, BrokenStore, ScriptedResolver};
use super::*;

const SHARED: &str = "check this out https://shop.example/item?utm_source=ig&id=42";

fn utm() -> QueryParam {
    QueryParam::new("utm_source", Some("ig"))
}

fn id() -> QueryParam {
    QueryParam::new("id", Some("42"))
}

fn fresh() -> (Arc<MemoryPreferenceStore>, Arc<ScriptedResolver>, SanitizeSession) {
    let prefs = Arc::new(MemoryPreferenceStore::new());
    let resolver = Arc::new(ScriptedResolver::returning(None));
    let s = session(Arc::clone(&prefs), Arc::clone(&resolver));
    (prefs, resolver, s)
}

fn intent(text: &str) -> Action {
    Action::IntentReceived {
        text: text.to_string(),
        read_only: true,
    }
}

#[test]
fn new_session_is_idle() {
    let (_, _, s) = fresh();
    assert_eq!(s.state().phase(), Phase::Idle);
    assert!(s.state().parameters.is_empty());
    assert_eq!(s.state().sanitized_url, "");
}

#[tokio::test]
async fn intent_defaults_unseen_params_to_dropped() {
    let (_, _, mut s) = fresh();
    let effects = s.apply(intent(SHARED)).await;
    assert!(effects.is_empty());

    let state = s.state();
    assert_eq!(state.phase(), Phase::Ready);
    assert_eq!(state.host(), Some("shop.example"));
    let keys: Vec<_> = state.parameters.iter().collect();
    assert_eq!(keys, vec![(&utm(), false), (&id(), false)]);
    assert_eq!(state.sanitized_url, "https://shop.example/item");
    assert_eq!(state.hint, Hint::Default);
}

#[tokio::test]
async fn toggling_keeps_parameter() {
    let (_, _, mut s) = fresh();
    s.apply(intent(SHARED)).await;
    s.apply(Action::ParamToggled {
        param: utm(),
        keep: true,
    })
    .await;
    assert_eq!(
        s.state().sanitized_url,
        "https://shop.example/item?utm_source=ig"
    );

    s.set_param(&id(), true);
    assert_eq!(
        s.state().sanitized_url,
        "https://shop.example/item?utm_source=ig&id=42"
    );
}

#[tokio::test]
async fn toggle_twice_restores_url() {
    let (_, _, mut s) = fresh();
    s.apply(intent(SHARED)).await;
    let before = s.state().clone();
    assert!(s.toggle(&id()));
    assert_ne!(s.state().sanitized_url, before.sanitized_url);
    assert!(s.toggle(&id()));
    assert_eq!(s.state(), &before);
}

#[tokio::test]
async fn toggling_unknown_param_changes_nothing() {
    let (_, _, mut s) = fresh();
    s.apply(intent(SHARED)).await;
    let before = s.state().clone();
    assert!(!s.set_param(&QueryParam::new("id", Some("43")), true));
    assert_eq!(s.state(), &before);
}

#[tokio::test]
async fn missing_url_reports_not_detected() {
    let (_, _, mut s) = fresh();
    let effects = s.apply(intent("no link here")).await;
    assert_eq!(
        effects,
        vec![Effect::ShowErrorAndFinish(Message::UrlNotDetected)]
    );
    assert_eq!(s.state(), &SanitizeState::default());
}

#[tokio::test]
async fn bad_scheme_reports_unable_to_parse() {
    let (_, _, mut s) = fresh();
    let effects = s.apply(intent("ftp://files.example/x.iso")).await;
    assert_eq!(
        effects,
        vec![Effect::ShowErrorAndFinish(Message::UnableToParse)]
    );
    assert_eq!(s.state().phase(), Phase::Idle);
}

#[tokio::test]
async fn redirect_replaces_url_and_uses_new_host_prefs() {
    let prefs = Arc::new(MemoryPreferenceStore::new());
    prefs
        .set_enabled_params("shop.example", &["id".to_string()])
        .await
        .unwrap();
    let resolver = Arc::new(ScriptedResolver::returning(Some(
        "https://shop.example/item?id=42&utm_medium=social",
    )));
    let mut s = session(Arc::clone(&prefs), Arc::clone(&resolver));

    s.apply(intent("https://bit.ly/abc")).await;
    let effects = s.apply(Action::FetchRedirect).await;
    assert!(effects.is_empty());
    assert_eq!(resolver.calls(), 1);

    let state = s.state();
    assert_eq!(state.original_url, Some(url("https://shop.example/item?id=42&utm_medium=social")));
    assert_eq!(state.parameters.get(&id()), Some(true));
    assert_eq!(
        state.parameters.get(&QueryParam::new("utm_medium", Some("social"))),
        Some(false)
    );
    assert_eq!(state.sanitized_url, "https://shop.example/item?id=42");
    assert_eq!(state.hint, Hint::Default);
    assert!(!state.loading);
}

#[tokio::test]
async fn no_redirect_sets_hint_and_keeps_params() {
    let (_, resolver, mut s) = fresh();
    s.apply(intent(SHARED)).await;
    s.set_param(&utm(), true);
    let before = s.state().clone();

    let effects = s.apply(Action::FetchRedirect).await;
    assert_eq!(
        effects,
        vec![Effect::ShowToast(Message::RedirectNotDetected)]
    );
    assert_eq!(resolver.calls(), 1);
    let state = s.state();
    assert_eq!(state.hint, Hint::NoRedirectDetected);
    assert_eq!(state.parameters, before.parameters);
    assert_eq!(state.sanitized_url, before.sanitized_url);
    assert!(!state.loading);
}

#[tokio::test]
async fn redirect_without_url_is_ignored() {
    let (_, resolver, mut s) = fresh();
    assert!(s.apply(Action::FetchRedirect).await.is_empty());
    assert_eq!(resolver.calls(), 0);
    assert!(!s.state().loading);
}

#[tokio::test]
async fn begin_redirect_sets_loading_and_rejects_second_request() {
    let (_, _, mut s) = fresh();
    s.apply(intent(SHARED)).await;
    let pending = s.begin_redirect().expect("lookup starts");
    assert_eq!(pending.url(), s.state().original_url.as_ref().unwrap());
    assert_eq!(s.state().phase(), Phase::Resolving);
    assert!(s.begin_redirect().is_none());

    s.finish_redirect(None).await;
    assert_eq!(s.state().phase(), Phase::Ready);
}

#[tokio::test]
async fn cancel_redirect_leaves_url_and_params_untouched() {
    let (_, _, mut s) = fresh();
    s.apply(intent(SHARED)).await;
    s.set_param(&utm(), true);
    let before = s.state().clone();

    let _pending = s.begin_redirect().expect("lookup starts");
    s.cancel_redirect();
    assert_eq!(s.state().phase(), Phase::Ready);
    assert_eq!(s.state(), &before);
    assert!(s.begin_redirect().is_some());
}

#[tokio::test(start_paused = true)]
async fn redirect_lookup_is_padded_to_minimum_duration() {
    let prefs = Arc::new(MemoryPreferenceStore::new());
    let resolver = Arc::new(ScriptedResolver::returning(None));
    let mut opts = options();
    opts.min_resolve_duration = Duration::from_millis(1000);
    let mut s = SanitizeSession::new(
        Collaborators {
            prefs,
            resolver: resolver.clone(),
        },
        opts,
    );
    s.apply(intent(SHARED)).await;

    let start = tokio::time::Instant::now();
    s.apply(Action::FetchRedirect).await;
    assert!(start.elapsed() >= Duration::from_millis(1000));
}

#[tokio::test]
async fn buttons_emit_matching_effects() {
    let (_, _, mut s) = fresh();
    s.apply(Action::IntentReceived {
        text: SHARED.to_string(),
        read_only: false,
    })
    .await;
    let url = "https://shop.example/item".to_string();

    assert_eq!(
        s.apply(Action::ButtonTapped(ButtonType::Copy)).await,
        vec![Effect::CopyUrl(url.clone()), Effect::Finish]
    );
    assert_eq!(
        s.apply(Action::ButtonTapped(ButtonType::Open)).await,
        vec![Effect::OpenUrl(url.clone())]
    );
    assert_eq!(
        s.apply(Action::ButtonTapped(ButtonType::Share)).await,
        vec![Effect::ShareUrl(url.clone())]
    );
    assert_eq!(
        s.apply(Action::ButtonTapped(ButtonType::Return)).await,
        vec![Effect::ReturnUrl(url)]
    );
}

#[tokio::test]
async fn return_is_unavailable_when_read_only() {
    let (_, _, mut s) = fresh();
    s.apply(intent(SHARED)).await;
    assert!(s.state().read_only);
    assert!(s
        .apply(Action::ButtonTapped(ButtonType::Return))
        .await
        .is_empty());
}

#[tokio::test]
async fn buttons_without_url_do_nothing() {
    let (_, _, mut s) = fresh();
    assert!(s
        .apply(Action::ButtonTapped(ButtonType::Share))
        .await
        .is_empty());
}

#[tokio::test]
async fn dismiss_finishes() {
    let (_, _, mut s) = fresh();
    assert_eq!(s.apply(Action::Dismiss).await, vec![Effect::Finish]);
}

#[tokio::test]
async fn flush_persists_kept_names_for_next_session() {
    let (prefs, resolver, mut s) = fresh();
    s.apply(intent(SHARED)).await;
    s.set_param(&utm(), true);
    s.flush().await;
    assert_eq!(
        prefs.enabled_params("shop.example").await.unwrap(),
        vec!["utm_source".to_string()]
    );

    let mut next = session(Arc::clone(&prefs), resolver);
    next.apply(intent(SHARED)).await;
    assert_eq!(next.state().parameters.get(&utm()), Some(true));
    assert_eq!(next.state().parameters.get(&id()), Some(false));
    assert_eq!(
        next.state().sanitized_url,
        "https://shop.example/item?utm_source=ig"
    );
}

#[tokio::test]
async fn toggles_do_not_write_until_flush() {
    let (prefs, _, mut s) = fresh();
    s.apply(intent(SHARED)).await;
    s.set_param(&utm(), true);
    s.set_param(&id(), true);
    assert!(prefs.snapshot().await.is_empty());
}

#[tokio::test]
async fn new_intent_flushes_previous_url() {
    let (prefs, _, mut s) = fresh();
    s.apply(intent(SHARED)).await;
    s.set_param(&id(), true);
    s.apply(intent("https://news.example/a?page=2")).await;

    assert_eq!(s.state().host(), Some("news.example"));
    assert_eq!(
        prefs.enabled_params("shop.example").await.unwrap(),
        vec!["id".to_string()]
    );
}

#[tokio::test]
async fn failed_intent_keeps_current_session() {
    let (_, _, mut s) = fresh();
    s.apply(intent(SHARED)).await;
    let before = s.state().clone();
    s.apply(intent("nothing")).await;
    assert_eq!(s.state(), &before);
}

#[tokio::test]
async fn store_failures_fail_open() {
    let resolver = Arc::new(ScriptedResolver::returning(None));
    let mut s = SanitizeSession::new(
        Collaborators {
            prefs: Arc::new(BrokenStore),
            resolver,
        },
        options(),
    );
    assert!(s.apply(intent(SHARED)).await.is_empty());
    assert_eq!(s.state().parameters.len(), 2);
    assert_eq!(s.state().sanitized_url, "https://shop.example/item");
    s.set_param(&utm(), true);
    s.flush().await;
}

#[tokio::test]
async fn remembered_names_apply_to_every_matching_pair() {
    let mut table = HostPrefs::new();
    table.set("e.example", &["tag".to_string()]);
    let prefs = Arc::new(MemoryPreferenceStore::with_prefs(table));
    let mut s = session(prefs, Arc::new(ScriptedResolver::returning(None)));
    s.apply(intent("https://e.example/?tag=a&x=1&tag=b")).await;
    assert_eq!(s.state().sanitized_url, "https://e.example/?tag=a&tag=b");
}
