//! Engine actor: one task owns the [`SanitizeSession`] and processes actions
//! strictly in arrival order.
//!
//! State snapshots are published on a `watch` channel (latest value, any
//! number of observers). Effects go out on a separate ordered `mpsc` channel
//! so they are delivered once and never replayed to late observers.
//!
//! Redirect lookups run on their own task and post their result back into the
//! inbox, so toggles keep being accepted while a lookup is outstanding. Each
//! lookup is tagged with a generation; results for a URL that has since been
//! replaced, or for a session that has ended, are dropped.

mod actor;

use tokio::sync::{mpsc, oneshot, watch};

use crate::session::{Action, Effect, SanitizeSession, SanitizeState};

use actor::{Command, EngineActor};

/// The engine task has stopped (session ended or the task panicked).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("sanitization engine is no longer running")]
pub struct EngineClosed;

/// Receives effects in emission order.
pub type EffectReceiver = mpsc::UnboundedReceiver<Effect>;

/// Cheap handle for submitting actions and observing state.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    inbox: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SanitizeState>,
}

/// Spawn the actor for `session` on the current tokio runtime.
pub fn spawn(session: SanitizeSession) -> (EngineHandle, EffectReceiver) {
    let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(session.state().clone());
    let (effect_tx, effect_rx) = mpsc::unbounded_channel();

    let actor = EngineActor::new(session, inbox_tx.clone(), inbox_rx, state_tx, effect_tx);
    tokio::spawn(actor.run());

    let handle = EngineHandle {
        inbox: inbox_tx,
        state: state_rx,
    };
    (handle, effect_rx)
}

impl EngineHandle {
    /// Queue an action. Returns immediately; the transition is applied by the
    /// actor in order.
    pub fn post(&self, action: Action) -> Result<(), EngineClosed> {
        self.inbox
            .send(Command::Action(action))
            .map_err(|_| EngineClosed)
    }

    /// Latest published snapshot.
    pub fn state(&self) -> SanitizeState {
        self.state.borrow().clone()
    }

    /// A receiver that observes every subsequent snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SanitizeState> {
        self.state.clone()
    }

    /// Wait until all actions posted before this call have been applied and
    /// return the resulting snapshot. Outstanding redirect lookups are not
    /// waited for.
    pub async fn settle(&self) -> Result<SanitizeState, EngineClosed> {
        let (tx, rx) = oneshot::channel();
        self.inbox
            .send(Command::Sync(tx))
            .map_err(|_| EngineClosed)?;
        rx.await.map_err(|_| EngineClosed)
    }

    /// End the session: discard any outstanding lookup, flush preferences for
    /// the current host, and stop the actor. Returns the final snapshot, which
    /// is never `loading`.
    pub async fn end_session(&self) -> Result<SanitizeState, EngineClosed> {
        let (tx, rx) = oneshot::channel();
        self.inbox
            .send(Command::EndSession(tx))
            .map_err(|_| EngineClosed)?;
        rx.await.map_err(|_| EngineClosed)
    }
}
