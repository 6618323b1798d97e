//! templates
//!
//! Patching of the companion T4 code-generation templates.
//!
//! # Overview
//!
//! An edmx model `Foo.edmx` has up to two companion templates:
//!
//! - `Foo.Context.tt` - generates the DbContext class
//! - `Foo.tt` - generates the entity classes
//!
//! The patcher rewrites fixed generator expressions in each so that, at
//! generation time, every emitted member is prefixed with a documentation
//! comment built from its `Documentation.Summary`. A missing template is an
//! informational skip, never an error, and the patch runs independently of
//! the merge outcome.

pub mod markers;
pub mod patcher;

pub use markers::{MarkerRule, CONTEXT_RULES, ENTITY_RULES, MARKER_TABLE_VERSION};
pub use patcher::{
    apply_rules, companion_paths, patch_companions, patch_file, CompanionPaths, CompanionReport,
    PatchOutcome, TemplateError,
};
