//! `linkscrub prefs` – inspect and edit remembered parameters per host.

use anyhow::Result;
use linkscrub_core::host_prefs::{JsonPreferenceStore, PreferenceStore};

use crate::cli::PrefsCommand;

pub async fn run_prefs(store: &JsonPreferenceStore, command: PrefsCommand) -> Result<()> {
    match command {
        PrefsCommand::List => {
            let hosts = store.list_hosts().await?;
            if hosts.is_empty() {
                println!("No remembered parameters.");
            } else {
                println!("{:<32} {}", "HOST", "PARAMS");
                for (host, names) in hosts {
                    println!("{:<32} {}", host, names.join(","));
                }
            }
        }
        PrefsCommand::Show { host } => {
            let names = store.enabled_params(&host).await?;
            if names.is_empty() {
                println!("{host}: nothing remembered");
            } else {
                for name in names {
                    println!("{name}");
                }
            }
        }
        PrefsCommand::Set { host, names } => {
            store.set_enabled_params(&host, &names).await?;
            println!("{host}: {}", names.join(","));
        }
        PrefsCommand::Clear { host } => {
            if store.clear_host(&host).await? {
                println!("Forgot {host}.");
            } else {
                println!("{host}: nothing remembered");
            }
        }
    }
    Ok(())
}
