//! cli::commands
//!
//! Command handlers.

mod generate;

pub use generate::generate;
