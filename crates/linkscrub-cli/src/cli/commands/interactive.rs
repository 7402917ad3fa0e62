//! `linkscrub interactive` – line-driven session on stdin.

use anyhow::Result;
use linkscrub_core::engine::{self, EngineHandle};
use linkscrub_core::session::{Action, ButtonType, SanitizeSession};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{drain_effects, wait_until_idle};
use crate::cli::present::render_state;
use crate::cli::Context;

const HELP: &str = "t <n> toggle | r resolve | c copy | o open | s share | p return | q quit";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Input {
    Toggle(usize),
    Resolve,
    Button(ButtonType),
    Quit,
    Help,
}

pub(crate) fn parse_input(line: &str) -> Option<Input> {
    let mut words = line.split_whitespace();
    let cmd = words.next()?;
    let input = match cmd {
        "t" => Input::Toggle(words.next()?.parse().ok()?),
        "r" => Input::Resolve,
        "c" => Input::Button(ButtonType::Copy),
        "o" => Input::Button(ButtonType::Open),
        "s" => Input::Button(ButtonType::Share),
        "p" => Input::Button(ButtonType::Return),
        "q" => Input::Quit,
        "h" | "?" => Input::Help,
        _ => return None,
    };
    if words.next().is_some() {
        return None;
    }
    Some(input)
}

pub async fn run_interactive(ctx: &Context, text: Vec<String>, allow_return: bool) -> Result<i32> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let text = if text.is_empty() {
        match lines.next_line().await? {
            Some(line) => line,
            None => String::new(),
        }
    } else {
        text.join(" ")
    };

    let session = SanitizeSession::new(ctx.collaborators.clone(), ctx.options);
    let (handle, mut effects) = engine::spawn(session);
    handle.post(Action::IntentReceived {
        text,
        read_only: !allow_return,
    })?;
    handle.settle().await?;
    if let Some(code) = drain_effects(&mut effects) {
        handle.end_session().await?;
        return Ok(code);
    }

    print!("{}", render_state(&handle.state()));
    eprintln!("{HELP}");

    let code = loop {
        let Some(line) = lines.next_line().await? else {
            break 0;
        };
        let Some(input) = parse_input(&line) else {
            if !line.trim().is_empty() {
                eprintln!("{HELP}");
            }
            continue;
        };
        match input {
            Input::Toggle(n) => toggle_nth(&handle, n).await?,
            Input::Resolve => {
                handle.post(Action::FetchRedirect)?;
                wait_until_idle(&handle).await?;
            }
            Input::Button(kind) => handle.post(Action::ButtonTapped(kind))?,
            Input::Quit => handle.post(Action::Dismiss)?,
            Input::Help => {
                eprintln!("{HELP}");
                continue;
            }
        }
        let state = handle.settle().await?;
        if let Some(code) = drain_effects(&mut effects) {
            break code;
        }
        print!("{}", render_state(&state));
    };

    handle.end_session().await?;
    Ok(code)
}

async fn toggle_nth(handle: &EngineHandle, n: usize) -> Result<()> {
    let state = handle.settle().await?;
    match state.parameters.iter().nth(n) {
        Some((param, keep)) => handle.post(Action::ParamToggled {
            param: param.clone(),
            keep: !keep,
        })?,
        None => eprintln!("no parameter {n}"),
    }
    Ok(())
}
