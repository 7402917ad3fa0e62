//! Renders engine effects on the terminal.

use linkscrub_core::session::{Effect, SanitizeState};

/// What the command loop should do after an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Session is over; exit with this status.
    Exit(i32),
}

/// Exit status for a `ShowErrorAndFinish` effect.
pub const EXIT_SHARED_TEXT_REJECTED: i32 = 2;

pub fn present(effect: Effect) -> Flow {
    match effect {
        Effect::CopyUrl(url) | Effect::ShareUrl(url) | Effect::ReturnUrl(url) => {
            println!("{url}");
            Flow::Continue
        }
        Effect::OpenUrl(url) => {
            open_in_browser(&url);
            Flow::Continue
        }
        Effect::ShowToast(msg) => {
            eprintln!("{msg}");
            Flow::Continue
        }
        Effect::ShowErrorAndFinish(msg) => {
            eprintln!("linkscrub: {msg}");
            Flow::Exit(EXIT_SHARED_TEXT_REJECTED)
        }
        Effect::Finish => Flow::Exit(0),
    }
}

/// Hand the URL to `xdg-open`; print it instead if that is not possible.
fn open_in_browser(url: &str) {
    match std::process::Command::new("xdg-open").arg(url).spawn() {
        Ok(_) => tracing::debug!(url, "opened with xdg-open"),
        Err(e) => {
            tracing::warn!("xdg-open failed: {e}");
            println!("{url}");
        }
    }
}

/// Multi-line summary of a snapshot for the interactive view.
pub fn render_state(state: &SanitizeState) -> String {
    let mut out = String::new();
    if let Some(url) = &state.original_url {
        out.push_str(&format!("original:  {url}\n"));
    }
    for (i, (param, keep)) in state.parameters.iter().enumerate() {
        let mark = if keep { 'x' } else { ' ' };
        out.push_str(&format!("  [{mark}] {i:>2}  {param}\n"));
    }
    out.push_str(&format!("sanitized: {}\n", state.sanitized_url));
    if state.loading {
        out.push_str("(resolving redirect...)\n");
    }
    out
}
