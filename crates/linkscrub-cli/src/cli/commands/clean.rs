//! `linkscrub clean` – sanitize one shared text and act on the result.

use anyhow::Result;
use linkscrub_core::engine;
use linkscrub_core::session::{Action, ButtonType, SanitizeSession};

use super::{drain_effects, wait_until_idle};
use crate::cli::Context;

pub struct CleanArgs {
    pub text: String,
    pub resolve: bool,
    /// Parameter names to keep on top of the remembered ones.
    pub keep: Vec<String>,
    pub action: ButtonType,
}

pub async fn run_clean(ctx: &Context, args: CleanArgs) -> Result<i32> {
    let session = SanitizeSession::new(ctx.collaborators.clone(), ctx.options);
    let (handle, mut effects) = engine::spawn(session);

    handle.post(Action::IntentReceived {
        text: args.text,
        read_only: args.action != ButtonType::Return,
    })?;
    handle.settle().await?;
    if let Some(code) = drain_effects(&mut effects) {
        handle.end_session().await?;
        return Ok(code);
    }

    if args.resolve {
        handle.post(Action::FetchRedirect)?;
        wait_until_idle(&handle).await?;
    }

    let state = handle.settle().await?;
    for (param, keep) in state.parameters.iter() {
        if !keep && args.keep.iter().any(|name| name == &param.name) {
            handle.post(Action::ParamToggled {
                param: param.clone(),
                keep: true,
            })?;
        }
    }

    handle.post(Action::ButtonTapped(args.action))?;
    handle.settle().await?;
    let code = drain_effects(&mut effects).unwrap_or(0);

    let ended = handle.end_session().await?;
    tracing::info!(url = %ended.sanitized_url, "clean finished");
    Ok(code)
}
