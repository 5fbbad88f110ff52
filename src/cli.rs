//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Session-scoped GitHub repository monitor
#[derive(Debug, Parser)]
#[command(name = "repomon", version, about)]
pub struct Cli {
    /// Path to a config file (defaults to the standard lookup chain)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the monitor daemon (the default when no command is given)
    Run {
        /// Repository URLs to watch on the broadcast topic at startup
        #[arg(short, long = "watch")]
        watch: Vec<String>,
    },

    /// Fetch a repository once and print its summary
    Check {
        /// Repository URL or bare owner/repo
        url: String,
    },
}
