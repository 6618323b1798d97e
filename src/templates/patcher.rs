//! templates::patcher
//!
//! Literal marker substitution across the companion template files.
//!
//! # Design
//!
//! Substitution is pure text work ([`apply_rules`]) layered under the file
//! plumbing ([`patch_file`], [`patch_companions`]), so the marker table is
//! testable without I/O. Files are rewritten only when they exist and only
//! when at least one marker was found; a file with no remaining markers is
//! left byte-identical.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::markers::{MarkerRule, CONTEXT_RULES, ENTITY_RULES};
use crate::ui::output::{self, Verbosity};

/// Model file suffix the companion convention hangs off of.
const MODEL_SUFFIX: &str = ".edmx";

/// Errors from template patching.
///
/// Only real I/O failures on a file that exists are errors; absence is a
/// silent no-op by design.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to patch template '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// Outcome of patching one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The file does not exist; nothing was done.
    Missing,
    /// The file exists but contained no markers; left byte-identical.
    Unchanged,
    /// The file was rewritten; holds the number of markers replaced.
    Patched(usize),
}

impl PatchOutcome {
    /// Whether the file was present on disk.
    pub fn present(&self) -> bool {
        !matches!(self, PatchOutcome::Missing)
    }
}

/// The two companion template paths for a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionPaths {
    /// DbContext template (`.Context.tt`).
    pub context: PathBuf,
    /// Entity classes template (`.tt`).
    pub entity: PathBuf,
}

/// Per-file outcomes of a companion patch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanionReport {
    pub context: PatchOutcome,
    pub entity: PatchOutcome,
}

/// Derive the companion template paths from the model path.
///
/// Returns `None` when the model path does not end in `.edmx`; such a model
/// has no companions by convention.
pub fn companion_paths(input: &Path) -> Option<CompanionPaths> {
    let name = input.file_name()?.to_str()?;
    let stem = name.strip_suffix(MODEL_SUFFIX)?;
    Some(CompanionPaths {
        context: input.with_file_name(format!("{stem}.Context.tt")),
        entity: input.with_file_name(format!("{stem}.tt")),
    })
}

/// Apply a rule set to template text.
///
/// Returns the rewritten text and the number of marker occurrences replaced.
pub fn apply_rules(text: &str, rules: &[MarkerRule]) -> (String, usize) {
    let mut out = text.to_string();
    let mut replaced = 0;
    for rule in rules {
        let hits = out.matches(rule.marker).count();
        if hits > 0 {
            out = out.replace(rule.marker, rule.replacement);
            replaced += hits;
        }
    }
    (out, replaced)
}

/// Patch one template file in place.
///
/// A missing file is a no-op, not an error. The file is rewritten only when
/// a marker was actually replaced.
pub fn patch_file(path: &Path, rules: &[MarkerRule]) -> Result<PatchOutcome, TemplateError> {
    if !path.is_file() {
        return Ok(PatchOutcome::Missing);
    }
    let io_err = |source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    };
    let text = fs::read_to_string(path).map_err(io_err)?;
    let (patched, replaced) = apply_rules(&text, rules);
    if replaced == 0 {
        return Ok(PatchOutcome::Unchanged);
    }
    fs::write(path, patched).map_err(io_err)?;
    Ok(PatchOutcome::Patched(replaced))
}

/// Patch both companion templates of a model, reporting per file.
///
/// Runs regardless of what the merge resolved; it is keyed only by the
/// model's file name.
pub fn patch_companions(
    input: &Path,
    verbosity: Verbosity,
) -> Result<CompanionReport, TemplateError> {
    let Some(paths) = companion_paths(input) else {
        output::debug(
            format!(
                "'{}' has no {MODEL_SUFFIX} suffix; no companion templates",
                input.display()
            ),
            verbosity,
        );
        return Ok(CompanionReport {
            context: PatchOutcome::Missing,
            entity: PatchOutcome::Missing,
        });
    };

    let context = patch_file(&paths.context, CONTEXT_RULES)?;
    report_outcome(&paths.context, "table summaries", context, verbosity);

    let entity = patch_file(&paths.entity, ENTITY_RULES)?;
    report_outcome(&paths.entity, "column summaries", entity, verbosity);

    if context.present() && entity.present() {
        output::print(
            format!(
                "Run the \"Custom Tool\" on {} and {} to regenerate with summaries",
                paths.context.display(),
                paths.entity.display()
            ),
            verbosity,
        );
    }

    Ok(CompanionReport { context, entity })
}

fn report_outcome(path: &Path, what: &str, outcome: PatchOutcome, verbosity: Verbosity) {
    match outcome {
        PatchOutcome::Missing => output::print(
            format!("Template {} not found; skipped", path.display()),
            verbosity,
        ),
        PatchOutcome::Unchanged => output::print(
            format!("No markers left in {}; already patched", path.display()),
            verbosity,
        ),
        PatchOutcome::Patched(n) => output::print(
            format!("Added {what} to {} ({n} markers)", path.display()),
            verbosity,
        ),
    }
}
