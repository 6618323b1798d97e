//! catalog::mssql
//!
//! SQL Server implementation of [`MetadataSource`] over tiberius.
//!
//! # Design
//!
//! One TCP connection is opened per invocation and reused for every lookup.
//! Each lookup is a single parameterized `fn_listextendedproperty` query;
//! parameters are always bound, never concatenated into the SQL text.
//!
//! `fn_listextendedproperty` returns its `value` column as `sql_variant`,
//! which the TDS client cannot decode directly, so the query casts it to
//! `NVARCHAR(MAX)`.

use async_trait::async_trait;
use tiberius::{Client, ToSql};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use super::traits::{CatalogError, MetadataSource};
use crate::core::config::CatalogOptions;
use crate::core::connection::ConnectionDescriptor;

const TABLE_DOC_QUERY: &str = "\
    SELECT CAST([value] AS NVARCHAR(MAX)) AS [value] \
    FROM fn_listextendedproperty(@P1, 'schema', @P2, 'table', @P3, NULL, NULL)";

const COLUMN_DOC_QUERY: &str = "\
    SELECT CAST([value] AS NVARCHAR(MAX)) AS [value] \
    FROM fn_listextendedproperty(@P1, 'schema', @P2, 'table', @P3, 'column', @P4)";

/// Metadata source backed by a live SQL Server connection.
pub struct SqlServerMetadataSource {
    // tiberius clients are `&mut self` for queries; lookups are sequential,
    // so an async mutex keeps the trait surface `&self`.
    client: Mutex<Client<Compat<TcpStream>>>,
    options: CatalogOptions,
}

impl SqlServerMetadataSource {
    /// Open a connection to the catalog described by `descriptor`.
    pub async fn connect(
        descriptor: &ConnectionDescriptor,
        options: CatalogOptions,
    ) -> Result<Self, CatalogError> {
        let config = descriptor.to_client_config();
        let tcp = TcpStream::connect(descriptor.addr())
            .await
            .map_err(CatalogError::Connect)?;
        tcp.set_nodelay(true).map_err(CatalogError::Connect)?;
        let client = Client::connect(config, tcp.compat_write()).await?;
        Ok(Self {
            client: Mutex::new(client),
            options,
        })
    }

    async fn lookup(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> Result<Option<String>, CatalogError> {
        let mut client = self.client.lock().await;
        let row = client.query(sql, params).await?.into_row().await?;
        let value = match row {
            Some(row) => row.try_get::<&str, _>("value")?.map(str::to_owned),
            None => None,
        };
        Ok(value.filter(|v| !v.is_empty()))
    }
}

#[async_trait]
impl MetadataSource for SqlServerMetadataSource {
    async fn table_documentation(&self, table: &str) -> Result<Option<String>, CatalogError> {
        self.lookup(
            TABLE_DOC_QUERY,
            &[
                &self.options.property_name.as_str(),
                &self.options.schema.as_str(),
                &table,
            ],
        )
        .await
    }

    async fn column_documentation(
        &self,
        table: &str,
        column: &str,
    ) -> Result<Option<String>, CatalogError> {
        self.lookup(
            COLUMN_DOC_QUERY,
            &[
                &self.options.property_name.as_str(),
                &self.options.schema.as_str(),
                &table,
                &column,
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_bind_parameters_only() {
        // The fixed query text must never interpolate identifiers.
        assert!(TABLE_DOC_QUERY.contains("@P1"));
        assert!(TABLE_DOC_QUERY.contains("@P3"));
        assert!(COLUMN_DOC_QUERY.contains("@P4"));
        assert!(!TABLE_DOC_QUERY.contains("{}"));
        assert!(!COLUMN_DOC_QUERY.contains("{}"));
    }

    #[test]
    fn queries_cast_the_variant_value() {
        assert!(TABLE_DOC_QUERY.contains("CAST([value] AS NVARCHAR(MAX))"));
        assert!(COLUMN_DOC_QUERY.contains("CAST([value] AS NVARCHAR(MAX))"));
    }
}
