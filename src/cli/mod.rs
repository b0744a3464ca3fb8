//! CLI module for the replication receiver
//!
//! Provides command-line interface for:
//! - start: load config, start the certificate watchdog, serve
//! - check-config: validate a config file and exit

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check_config, run, run_command, start};
pub use errors::{CliError, CliErrorCode, CliResult};
