//! The engine task's message loop.

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::session::{Action, Effect, SanitizeSession, SanitizeState};
use crate::url_model::ParsedUrl;

pub(super) enum Command {
    Action(Action),
    RedirectResolved {
        generation: u64,
        resolved: Option<ParsedUrl>,
    },
    Sync(oneshot::Sender<SanitizeState>),
    EndSession(oneshot::Sender<SanitizeState>),
}

pub(super) struct EngineActor {
    session: SanitizeSession,
    // Weak so that dropping every handle closes the inbox and ends the session.
    inbox_tx: mpsc::WeakUnboundedSender<Command>,
    inbox_rx: mpsc::UnboundedReceiver<Command>,
    state_tx: watch::Sender<SanitizeState>,
    effect_tx: mpsc::UnboundedSender<Effect>,
    /// Bumped whenever the session's URL is replaced by a new intent.
    generation: u64,
    lookup: Option<JoinHandle<()>>,
}

impl EngineActor {
    pub(super) fn new(
        session: SanitizeSession,
        inbox_tx: mpsc::UnboundedSender<Command>,
        inbox_rx: mpsc::UnboundedReceiver<Command>,
        state_tx: watch::Sender<SanitizeState>,
        effect_tx: mpsc::UnboundedSender<Effect>,
    ) -> Self {
        Self {
            session,
            inbox_tx: inbox_tx.downgrade(),
            inbox_rx,
            state_tx,
            effect_tx,
            generation: 0,
            lookup: None,
        }
    }

    pub(super) async fn run(mut self) {
        let mut end_reply = None;
        while let Some(command) = self.inbox_rx.recv().await {
            match command {
                Command::Action(Action::FetchRedirect) => self.start_lookup(),
                Command::Action(action) => self.apply(action).await,
                Command::RedirectResolved {
                    generation,
                    resolved,
                } => self.complete_lookup(generation, resolved).await,
                Command::Sync(reply) => {
                    let _ = reply.send(self.session.state().clone());
                }
                Command::EndSession(reply) => {
                    end_reply = Some(reply);
                    break;
                }
            }
        }

        // Session end, either requested or because every handle was dropped.
        self.inbox_rx.close();
        self.cancel_lookup();
        self.session.cancel_redirect();
        self.publish();
        self.session.flush().await;
        if let Some(reply) = end_reply {
            let _ = reply.send(self.session.state().clone());
        }
        tracing::debug!("engine stopped");
    }

    async fn apply(&mut self, action: Action) {
        let is_intent = matches!(action, Action::IntentReceived { .. });
        let effects = self.session.apply(action).await;
        if is_intent && !effects.iter().any(Effect::is_terminal) {
            // A new URL was loaded; any lookup for the old one is stale.
            self.generation += 1;
            self.cancel_lookup();
        }
        self.publish();
        self.emit(effects);
    }

    fn start_lookup(&mut self) {
        let Some(pending) = self.session.begin_redirect() else {
            return;
        };
        self.publish();

        // The task only holds a weak sender while it waits, so dropping every
        // handle still ends the session mid-lookup.
        let inbox = self.inbox_tx.clone();
        let generation = self.generation;
        self.lookup = Some(tokio::spawn(async move {
            let resolved = pending.run().await;
            match inbox.upgrade() {
                Some(inbox) => {
                    let _ = inbox.send(Command::RedirectResolved {
                        generation,
                        resolved,
                    });
                }
                None => tracing::debug!("session ended; dropping redirect result"),
            }
        }));
    }

    async fn complete_lookup(&mut self, generation: u64, resolved: Option<ParsedUrl>) {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "dropping stale redirect result");
            return;
        }
        self.lookup = None;
        let effects = self.session.finish_redirect(resolved).await;
        self.publish();
        self.emit(effects);
    }

    fn cancel_lookup(&mut self) {
        if let Some(task) = self.lookup.take() {
            task.abort();
        }
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.session.state().clone());
    }

    fn emit(&self, effects: Vec<Effect>) {
        for effect in effects {
            tracing::debug!(?effect, "effect");
            if self.effect_tx.send(effect).is_err() {
                tracing::debug!("effect receiver dropped");
            }
        }
    }
}
