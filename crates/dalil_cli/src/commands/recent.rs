//! Recent command implementation

use dalil_storage::RecentlyViewed;
use miette::{IntoDiagnostic, Result};
use tracing::info;

use crate::cli::RecentCommands;
use crate::commands::{open_store, print_ids};
use crate::config::DalilConfig;

pub fn run_recent(config: &DalilConfig, command: &RecentCommands) -> Result<()> {
    let store = open_store(config)?;
    let mut recent = RecentlyViewed::with_capacity(store, config.recently_viewed_capacity);

    match command {
        RecentCommands::Add { id } => {
            recent.add(id.as_str()).into_diagnostic()?;
            info!("Recorded view of {}", id);
        }
        RecentCommands::Remove { id } => {
            if recent.remove(id).into_diagnostic()? {
                info!("Removed {}", id);
            } else {
                info!("{} is not in the recently viewed list", id);
            }
        }
        RecentCommands::List { details } => print_ids(config, &recent.ids(), *details)?,
        RecentCommands::Clear => {
            recent.clear().into_diagnostic()?;
            info!("Cleared recently viewed tools");
        }
    }
    Ok(())
}
