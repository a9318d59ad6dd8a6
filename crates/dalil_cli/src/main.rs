//! Dalil CLI
//!
//! Browse the AI tool directory and manage the recently viewed and compare
//! lists from the terminal.

mod cli;
mod commands;
mod config;
mod runtime;

use std::process::ExitCode;

use clap::Parser;
use dalil_dataset::ToolQuery;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::compare::run_compare;
use crate::commands::init::run_init;
use crate::commands::recent::run_recent;
use crate::commands::tools::run_tools;
use crate::config::DalilConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Init skips loading so it can replace a broken config.
    let load_config = || DalilConfig::load(cli.config.as_deref());

    match &cli.command {
        Commands::Init { force } => run_init(*force),
        Commands::Tools {
            search,
            category,
            offset,
            format,
        } => {
            let mut query = ToolQuery::new().offset(*offset);
            if let Some(search) = search {
                query = query.search(search.as_str());
            }
            if let Some(category) = category {
                query = query.category(category.as_str());
            }
            run_tools(&load_config()?, &query, *format)
        }
        Commands::Recent { command } => run_recent(&load_config()?, command),
        Commands::Compare { command } => run_compare(&load_config()?, command),
    }
}
