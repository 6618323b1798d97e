//! catalog
//!
//! Abstraction over the catalog's extended-property lookup.
//!
//! # Architecture
//!
//! The [`MetadataSource`] trait is the seam between the merge engine and the
//! database. The merge engine only ever sees `&dyn MetadataSource`; the
//! command layer constructs the concrete [`mssql::SqlServerMetadataSource`]
//! once per invocation and drops it when the run ends, so the connection is
//! released on every exit path.

pub mod mock;
pub mod mssql;
pub mod traits;

pub use mock::MockMetadataSource;
pub use mssql::SqlServerMetadataSource;
pub use traits::{CatalogError, MetadataSource};
