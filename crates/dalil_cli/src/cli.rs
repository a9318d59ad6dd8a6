//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Dalil - browse the AI tool directory from the terminal
#[derive(Parser)]
#[command(name = "dalil")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// List published tools
    Tools {
        /// Text to match in title or description
        #[arg(short, long)]
        search: Option<String>,

        /// Category to filter by
        #[arg(long)]
        category: Option<String>,

        /// Offset of the first tool to show
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Manage recently viewed tools
    Recent {
        #[command(subcommand)]
        command: RecentCommands,
    },

    /// Manage the compare selection
    Compare {
        #[command(subcommand)]
        command: CompareCommands,
    },
}

#[derive(Subcommand)]
pub enum RecentCommands {
    /// Record a view of a tool
    Add { id: String },
    /// Forget a tool
    Remove { id: String },
    /// Show tools, most recent first
    List {
        /// Resolve ids to titles from the dataset
        #[arg(long)]
        details: bool,
    },
    /// Forget all tools
    Clear,
}

#[derive(Subcommand)]
pub enum CompareCommands {
    /// Select a tool for comparison
    Add { id: String },
    /// Deselect a tool
    Remove { id: String },
    /// Replace the selection
    Set {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show selected tools
    List {
        /// Resolve ids to titles from the dataset
        #[arg(long)]
        details: bool,
    },
    /// Deselect all tools
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
