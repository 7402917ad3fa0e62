//! Inputs to and one-shot outputs from a session.

use std::fmt;

use crate::url_model::QueryParam;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonType {
    Copy,
    Open,
    Return,
    Share,
}

/// Something the user or the host platform asks the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Shared text arrived. `read_only == false` lets the result be returned
    /// to the caller.
    IntentReceived { text: String, read_only: bool },
    /// Set the keep flag of exactly this `(name, value)` pair.
    ParamToggled { param: QueryParam, keep: bool },
    FetchRedirect,
    ButtonTapped(ButtonType),
    Dismiss,
}

/// User-facing message kinds carried by effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    UrlNotDetected,
    UnableToParse,
    RedirectNotDetected,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Message::UrlNotDetected => "No URL detected in the shared text",
            Message::UnableToParse => "Unable to parse URL",
            Message::RedirectNotDetected => "No redirect detected",
        };
        f.write_str(text)
    }
}

/// One-shot output for the presentation layer. Consumed once, never replayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CopyUrl(String),
    OpenUrl(String),
    ReturnUrl(String),
    ShareUrl(String),
    ShowToast(Message),
    ShowErrorAndFinish(Message),
    Finish,
}

impl Effect {
    /// True when the presentation layer should end the session after this.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Effect::Finish | Effect::ShowErrorAndFinish(_))
    }
}
