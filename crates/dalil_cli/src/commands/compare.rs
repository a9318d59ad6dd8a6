//! Compare command implementation

use std::sync::Arc;

use dalil_storage::{CompareList, RecordingNotifier};
use miette::{IntoDiagnostic, Result};
use tracing::info;

use crate::cli::CompareCommands;
use crate::commands::{open_store, print_ids};
use crate::config::DalilConfig;

pub fn run_compare(config: &DalilConfig, command: &CompareCommands) -> Result<()> {
    let store = open_store(config)?;
    let notifier = Arc::new(RecordingNotifier::new());
    let mut list =
        CompareList::with_capacity(store, Arc::clone(&notifier), config.compare_capacity);

    let result = match command {
        CompareCommands::Add { id } => list.add(id.as_str()).map(|_| ()),
        CompareCommands::Remove { id } => list.remove(id).map(|removed| {
            if !removed {
                info!("{} is not selected", id);
            }
        }),
        CompareCommands::Set { ids } => list.set_list(ids.iter().cloned()).map(|()| {
            if ids.len() > list.capacity() {
                info!("Kept the first {} of {} tools", list.capacity(), ids.len());
            }
        }),
        CompareCommands::List { details } => return print_ids(config, &list.ids(), *details),
        CompareCommands::Clear => list.clear(),
    };

    // Notices are shown even when the write failed; memory state is authoritative.
    for notice in notifier.take() {
        println!("{}", notice.message(config.locale));
    }
    result.into_diagnostic()
}
