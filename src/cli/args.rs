//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Flags
//!
//! - `--connection-string` / `-c`: ADO.NET-style descriptor, validated here
//! - `--input` / `-i`: original edmx file (must exist)
//! - `--output` / `-o`: output edmx file, defaults to the input
//! - `--skip-templates`: merge only, leave companion templates untouched
//! - `--quiet` / `-q`: minimal output
//! - `--debug`: verbose output

use clap::Parser;
use std::path::PathBuf;

use crate::core::connection::{ConnectionDescriptor, ConnectionError};

/// edmxdoc - Merge SQL Server documentation into EF edmx models
#[derive(Parser, Debug)]
#[command(name = "edmxdoc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Connection string of the documented database
    #[arg(short = 'c', long, value_parser = parse_connection)]
    pub connection_string: ConnectionDescriptor,

    /// Original edmx file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output edmx file (defaults to the original edmx file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Leave companion templates untouched
    #[arg(long)]
    pub skip_templates: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// The output path, defaulting to the input path.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| self.input.clone())
    }
}

/// Connection-string conversion for clap; rejects bad descriptors at the
/// argument boundary.
fn parse_connection(s: &str) -> Result<ConnectionDescriptor, ConnectionError> {
    s.parse()
}
