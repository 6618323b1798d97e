//! cli
//!
//! Command-line interface layer for edmxdoc.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and validate the connection descriptor
//! - Delegate to the merge/patch command
//!
//! # Architecture
//!
//! The CLI layer is thin. The connection string is parsed and validated at
//! the argument boundary, so a bad descriptor fails before any file or
//! catalog activity. The command handler owns the catalog connection for the
//! duration of one invocation.

pub mod args;
pub mod commands;

pub use args::Cli;

use anyhow::Result;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    commands::generate(&cli)
}
