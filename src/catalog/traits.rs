//! catalog::traits
//!
//! MetadataSource trait definition.
//!
//! # Design
//!
//! The trait is async because lookups are network round trips. Both methods
//! return `Ok(None)` when no documentation is recorded, which includes the
//! case where the recorded value is an empty string - an empty summary is
//! never propagated into the model.
//!
//! Failures are not caught here: once the metadata source is unreachable
//! there is no meaningful recovery, so errors surface to the invocation
//! boundary and abort the run before anything is written.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog could not be reached.
    #[error("failed to reach the catalog: {0}")]
    Connect(#[source] std::io::Error),

    /// A query failed after the connection was established.
    #[error("catalog query failed: {0}")]
    Query(#[from] tiberius::error::Error),

    /// The source reported itself unavailable.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Lookup interface for table- and column-level documentation.
///
/// Implementations must be `Send + Sync` so a source can be shared by
/// reference across async calls.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch the documentation recorded for a table.
    ///
    /// Returns `Ok(None)` when no non-empty documentation is recorded.
    async fn table_documentation(&self, table: &str) -> Result<Option<String>, CatalogError>;

    /// Fetch the documentation recorded for a column of a table.
    ///
    /// Returns `Ok(None)` when no non-empty documentation is recorded.
    async fn column_documentation(
        &self,
        table: &str,
        column: &str,
    ) -> Result<Option<String>, CatalogError>;
}
