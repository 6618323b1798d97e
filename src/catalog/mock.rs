//! catalog::mock
//!
//! Mock metadata source for deterministic testing.
//!
//! # Design
//!
//! The mock stores table and column documentation in memory and allows
//! configuring a failure mode, so merge behavior can be tested without a
//! live catalog.
//!
//! # Example
//!
//! ```
//! use edmxdoc::catalog::{MetadataSource, MockMetadataSource};
//!
//! # tokio_test::block_on(async {
//! let source = MockMetadataSource::new()
//!     .with_table("Customer", "Customer record")
//!     .with_column("Customer", "Id", "Surrogate key");
//!
//! let doc = source.table_documentation("Customer").await.unwrap();
//! assert_eq!(doc.as_deref(), Some("Customer record"));
//!
//! let doc = source.table_documentation("Order").await.unwrap();
//! assert!(doc.is_none());
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{CatalogError, MetadataSource};

/// In-memory metadata source for tests.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockMetadataSource {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<String, String>,
    columns: HashMap<(String, String), String>,
    unavailable: Option<String>,
}

impl MockMetadataSource {
    /// Create an empty mock: every lookup returns `None`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: record table documentation.
    pub fn with_table(self, table: &str, doc: &str) -> Self {
        self.set_table(table, doc);
        self
    }

    /// Builder-style: record column documentation.
    pub fn with_column(self, table: &str, column: &str, doc: &str) -> Self {
        self.set_column(table, column, doc);
        self
    }

    /// Record table documentation.
    pub fn set_table(&self, table: &str, doc: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.tables.insert(table.to_string(), doc.to_string());
    }

    /// Record column documentation.
    pub fn set_column(&self, table: &str, column: &str, doc: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .columns
            .insert((table.to_string(), column.to_string()), doc.to_string());
    }

    /// Remove any table documentation.
    pub fn clear_table(&self, table: &str) {
        self.inner.lock().unwrap().tables.remove(table);
    }

    /// Make every subsequent lookup fail with `CatalogError::Unavailable`.
    pub fn set_unavailable(&self, reason: &str) {
        self.inner.lock().unwrap().unavailable = Some(reason.to_string());
    }

    fn check_available(&self, inner: &Inner) -> Result<(), CatalogError> {
        match &inner.unavailable {
            Some(reason) => Err(CatalogError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MetadataSource for MockMetadataSource {
    async fn table_documentation(&self, table: &str) -> Result<Option<String>, CatalogError> {
        let inner = self.inner.lock().unwrap();
        self.check_available(&inner)?;
        Ok(inner
            .tables
            .get(table)
            .filter(|d| !d.is_empty())
            .cloned())
    }

    async fn column_documentation(
        &self,
        table: &str,
        column: &str,
    ) -> Result<Option<String>, CatalogError> {
        let inner = self.inner.lock().unwrap();
        self.check_available(&inner)?;
        Ok(inner
            .columns
            .get(&(table.to_string(), column.to_string()))
            .filter(|d| !d.is_empty())
            .cloned())
    }
}
