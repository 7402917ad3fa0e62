//! Sanitization session: state, actions, effects, and the state machine that
//! ties the extractor, sanitizer, preference store, and redirect resolver
//! together.

mod action;
mod machine;
mod params;
mod state;

pub use action::{Action, ButtonType, Effect, Message};
pub use machine::{Collaborators, PendingRedirect, SanitizeSession, SessionOptions};
pub use params::ParameterMap;
pub use state::{Hint, Phase, SanitizeState};

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests;
