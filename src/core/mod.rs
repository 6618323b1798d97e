//! core
//!
//! Domain-level support types: connection-descriptor parsing and the
//! optional configuration file.

pub mod config;
pub mod connection;
