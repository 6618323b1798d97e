//! edmxdoc - Merge SQL Server documentation into EF edmx models
//!
//! edmxdoc is a single-binary tool that reads the `MS_Description` extended
//! properties recorded in a SQL Server catalog and merges them into an Entity
//! Framework `.edmx` model as `Documentation`/`Summary` nodes, then patches
//! the companion T4 templates so generated code carries the same comments.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to the merge)
//! - [`core`] - Connection-descriptor parsing and configuration
//! - [`catalog`] - Abstraction over the catalog's extended-property lookup
//! - [`model`] - Scan and merge passes over the edmx event stream
//! - [`templates`] - Marker-based patching of companion T4 templates
//! - [`ui`] - Output utilities
//!
//! # Correctness Invariants
//!
//! edmxdoc maintains the following invariants:
//!
//! 1. The model is mutated entirely in memory and written once, at the end,
//!    so a fatal failure mid-run never leaves a partial output file
//! 2. Re-running against unchanged metadata reproduces byte-identical output
//! 3. A `Documentation` node is only ever persisted with non-empty text, and
//!    always as the first child of its owning node
//! 4. Catalog queries always bind parameters, never concatenate them

pub mod catalog;
pub mod cli;
pub mod core;
pub mod model;
pub mod templates;
pub mod ui;
