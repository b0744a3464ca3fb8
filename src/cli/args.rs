//! CLI argument definitions using clap
//!
//! Commands:
//! - replication-receiver start --config <path>
//! - replication-receiver check-config --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Replication receiver gateway
#[derive(Parser, Debug)]
#[command(name = "replication-receiver")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the receiver
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./receiver.json")]
        config: PathBuf,
    },

    /// Validate a configuration file and exit
    CheckConfig {
        /// Path to configuration file
        #[arg(long, default_value = "./receiver.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
