//! CLI command handlers, one file per command.

mod clean;
mod demo;
mod interactive;
mod prefs;

use anyhow::{Context as _, Result};
use linkscrub_core::engine::{EffectReceiver, EngineHandle};

use super::present::{present, Flow};

pub use clean::{run_clean, CleanArgs};
pub use demo::run_demo;
pub use interactive::run_interactive;
pub use prefs::run_prefs;

/// Joined positional args, or all of stdin when none were given.
pub fn text_or_stdin(args: Vec<String>) -> Result<String> {
    if !args.is_empty() {
        return Ok(args.join(" "));
    }
    std::io::read_to_string(std::io::stdin()).context("read shared text from stdin")
}

/// Present every effect queued so far. Returns the exit status if one of them
/// ended the session.
pub(crate) fn drain_effects(effects: &mut EffectReceiver) -> Option<i32> {
    while let Ok(effect) = effects.try_recv() {
        if let Flow::Exit(code) = present(effect) {
            return Some(code);
        }
    }
    None
}

/// Wait for an outstanding redirect lookup to land.
pub(crate) async fn wait_until_idle(handle: &EngineHandle) -> Result<()> {
    let state = handle.settle().await?;
    if state.loading {
        let mut rx = handle.subscribe();
        rx.wait_for(|s| !s.loading)
            .await
            .context("engine stopped while resolving")?;
        handle.settle().await?;
    }
    Ok(())
}
