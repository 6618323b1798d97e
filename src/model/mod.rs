//! model
//!
//! The edmx model: loading, the scan and merge passes, and the final save.
//!
//! # Design
//!
//! The model is never held as a DOM. Both passes run over quick-xml event
//! streams: [`scan`] collects entity and property names in document order,
//! [`merge`] writes a new document with `Documentation` nodes rewritten.
//! Everything the passes do not touch round-trips byte-for-byte, which is
//! what makes re-runs reproduce identical output.
//!
//! The save is a single write at the very end of a successful merge. A fatal
//! failure during lookup or traversal therefore leaves the output file
//! untouched.

pub mod merge;
pub mod scan;

pub use merge::{EntityDocs, MergeError};
pub use scan::EntityScan;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from model operations.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model file '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write model file '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    /// The document contained no root element.
    #[error("model has no root element")]
    NoRootElement,

    /// An entity or property carried no usable `Name` attribute.
    #[error("{kind} node #{index} has no Name attribute")]
    MissingName { kind: &'static str, index: usize },

    /// The document ended inside an element.
    #[error("model is truncated: unexpected end of document")]
    TruncatedDocument,

    #[error("merged model was not valid UTF-8")]
    NonUtf8,

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Read the model file into memory.
pub fn load(path: &Path) -> Result<String, ModelError> {
    fs::read_to_string(path).map_err(|source| ModelError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the merged model, replacing any pre-existing file at `path`.
pub fn save(text: &str, path: &Path) -> Result<(), ModelError> {
    let write_err = |source| ModelError::Write {
        path: path.to_path_buf(),
        source,
    };
    if path.exists() {
        fs::remove_file(path).map_err(write_err)?;
    }
    fs::write(path, text).map_err(write_err)
}
