use async_trait::async_trait;

use autodefine_core::{CatalogRow, ColumnDescription, Dialect, Result};

/// Connection facts the discovery phases need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub dialect: Dialect,
    /// Database the connection points at, used as the key-query scope.
    pub database: Option<String>,
    /// Default schema for table enumeration and description.
    pub schema: Option<String>,
}

/// Query capability over a live database catalog.
///
/// Implementations own their connection lifecycle; discovery only issues
/// queries and reads rows back as plain key/value records.
#[async_trait]
pub trait Catalog: Send + Sync {
    fn config(&self) -> &CatalogConfig;

    /// Enumerate user tables in catalog order.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Describe the columns of one table in catalog order.
    async fn describe_table(&self, table: &str, schema: Option<&str>)
    -> Result<Vec<ColumnDescription>>;

    /// Run raw SQL and return every row as a JSON object.
    async fn query_rows(&self, sql: &str) -> Result<Vec<CatalogRow>>;
}
