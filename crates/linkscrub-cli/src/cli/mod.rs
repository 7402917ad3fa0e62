//! CLI for linkscrub.

mod commands;
mod present;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use linkscrub_core::config::{self, LinkscrubConfig};
use linkscrub_core::host_prefs::JsonPreferenceStore;
use linkscrub_core::redirect::CurlRedirectResolver;
use linkscrub_core::session::{ButtonType, Collaborators, SessionOptions};

use commands::{run_clean, run_demo, run_interactive, run_prefs, CleanArgs};

/// Top-level CLI for linkscrub.
#[derive(Debug, Parser)]
#[command(name = "linkscrub")]
#[command(about = "linkscrub: strip tracking parameters from shared links", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// What to do with the sanitized URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ButtonArg {
    Copy,
    Open,
    Share,
    Return,
}

impl From<ButtonArg> for ButtonType {
    fn from(arg: ButtonArg) -> Self {
        match arg {
            ButtonArg::Copy => ButtonType::Copy,
            ButtonArg::Open => ButtonType::Open,
            ButtonArg::Share => ButtonType::Share,
            ButtonArg::Return => ButtonType::Return,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Sanitize the URL found in TEXT (or stdin) and print it.
    Clean {
        /// Shared text containing a link. Read from stdin when omitted.
        text: Vec<String>,

        /// Follow a short-link redirect before sanitizing.
        #[arg(long)]
        resolve: bool,

        /// Keep parameters with this name for this run (repeatable).
        #[arg(long = "keep", value_name = "NAME")]
        keep: Vec<String>,

        /// What to do with the result.
        #[arg(long, value_enum, default_value = "return")]
        action: ButtonArg,
    },

    /// Step through a session: toggle parameters, resolve redirects, then act.
    Interactive {
        /// Shared text containing a link. Read from the first stdin line when omitted.
        text: Vec<String>,

        /// Allow handing the result back with the `p` command.
        #[arg(long)]
        allow_return: bool,
    },

    /// Inspect or edit remembered per-host parameters.
    Prefs {
        #[command(subcommand)]
        command: PrefsCommand,
    },

    /// Sanitize one of the bundled sample share texts.
    Demo {
        /// Sample index (see `demo --list`).
        #[arg(default_value = "0")]
        index: usize,

        /// List the samples instead of running one.
        #[arg(long)]
        list: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum PrefsCommand {
    /// List every host with remembered parameters.
    List,
    /// Show remembered parameters for a host.
    Show { host: String },
    /// Replace the remembered parameters for a host.
    Set { host: String, names: Vec<String> },
    /// Forget a host.
    Clear { host: String },
}

/// Shared wiring for commands that run a session.
pub struct Context {
    pub collaborators: Collaborators,
    pub options: SessionOptions,
    pub prefs: Arc<JsonPreferenceStore>,
}

impl Context {
    fn from_config(cfg: &LinkscrubConfig) -> Result<Self> {
        let prefs_path = match &cfg.prefs_path {
            Some(path) => path.clone(),
            None => JsonPreferenceStore::default_path()?,
        };
        tracing::debug!("host prefs at {}", prefs_path.display());
        let prefs = Arc::new(JsonPreferenceStore::new(prefs_path));
        let collaborators = Collaborators {
            prefs: prefs.clone(),
            resolver: Arc::new(CurlRedirectResolver::new(cfg.resolver.clone())),
        };
        Ok(Self {
            collaborators,
            options: SessionOptions::from(cfg),
            prefs,
        })
    }
}

impl CliCommand {
    /// Returns the process exit code.
    pub async fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let ctx = Context::from_config(&cfg)?;

        let code = match cli.command {
            CliCommand::Clean {
                text,
                resolve,
                keep,
                action,
            } => {
                let args = CleanArgs {
                    text: commands::text_or_stdin(text)?,
                    resolve,
                    keep,
                    action: action.into(),
                };
                run_clean(&ctx, args).await?
            }
            CliCommand::Interactive { text, allow_return } => {
                run_interactive(&ctx, text, allow_return).await?
            }
            CliCommand::Prefs { command } => {
                run_prefs(&ctx.prefs, command).await?;
                0
            }
            CliCommand::Demo { index, list } => run_demo(&ctx, index, list).await?,
        };

        Ok(code)
    }
}

#[cfg(test)]
mod tests;
