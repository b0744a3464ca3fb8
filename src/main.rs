//! Replication receiver entry point
//!
//! main.rs only parses arguments, dispatches to the CLI module, and turns a
//! failure into a non-zero exit code. Configuration loading, logging setup and
//! serving all live in `cli`.

use replication_receiver::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
