use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info, warn};

use autodefine_core::{
    CatalogRow, ColumnDescription, ForeignKeyIndex, GeneratorOptions, KeyRecord, Result,
    TableDescription, TableMetadata,
};

use crate::catalog::Catalog;
use crate::dialects::{CatalogDialect, adapter_for};
use crate::keys::classify_row;

/// Everything discovered about a database in one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Discovery {
    pub tables: TableMetadata,
    pub foreign_keys: ForeignKeyIndex,
}

/// Run table discovery, key discovery and column description in order.
///
/// Key-query failures are logged and skipped per table; description failures
/// abort the run.
pub async fn discover(catalog: &dyn Catalog, options: &GeneratorOptions) -> Result<Discovery> {
    let config = catalog.config();
    let adapter = adapter_for(config.dialect);
    let schema = options.schema.as_deref().or(config.schema.as_deref());
    let concurrency = options.concurrency.max(1);

    let discovered = list_tables(catalog, adapter, schema).await?;
    let tables = options.filter_tables(discovered);
    info!(
        event = "tables_discovered",
        dialect = %config.dialect,
        tables = tables.len()
    );

    let key_rows = stream::iter(tables.iter())
        .map(|table| async move { (table, foreign_key_records(catalog, adapter, table).await) })
        .buffered(concurrency)
        .collect::<Vec<_>>()
        .await;

    let mut foreign_keys = ForeignKeyIndex::new();
    for (table, outcome) in key_rows {
        match outcome {
            Ok(records) => {
                for (column, record) in records {
                    foreign_keys.insert(table, &column, record);
                }
            }
            Err(err) => {
                warn!(event = "foreign_keys_failed", table = %table, error = %err);
            }
        }
    }

    let described = stream::iter(tables.iter())
        .map(|table| describe(catalog, adapter, table, schema))
        .buffered(concurrency)
        .try_collect::<Vec<_>>()
        .await?;

    Ok(Discovery {
        tables: described,
        foreign_keys,
    })
}

async fn list_tables(
    catalog: &dyn Catalog,
    adapter: &dyn CatalogDialect,
    schema: Option<&str>,
) -> Result<Vec<String>> {
    let Some(query) = adapter.list_tables_query(schema) else {
        return catalog.list_tables().await;
    };

    let rows = catalog.query_rows(&query).await?;
    Ok(rows
        .iter()
        .filter_map(|row| text_field(row, "table_name"))
        .collect())
}

/// Names of identity-generated columns of `table`, or nothing when the
/// backend has no identity query.
pub async fn identity_columns(
    catalog: &dyn Catalog,
    adapter: &dyn CatalogDialect,
    table: &str,
) -> Result<Vec<String>> {
    let Some(query) = adapter.identity_columns_query(table) else {
        return Ok(Vec::new());
    };

    let rows = catalog.query_rows(&query).await?;
    Ok(rows
        .iter()
        .filter_map(|row| text_field(row, "column_name"))
        .collect())
}

fn text_field(row: &CatalogRow, key: &str) -> Option<String> {
    row.iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .and_then(|(_, value)| value.as_str())
        .map(str::to_string)
}

async fn foreign_key_records(
    catalog: &dyn Catalog,
    adapter: &dyn CatalogDialect,
    table: &str,
) -> Result<Vec<(String, KeyRecord)>> {
    let database = catalog.config().database.as_deref();
    let Some(query) = adapter.foreign_keys_query(table, database) else {
        return Ok(Vec::new());
    };

    let rows = catalog.query_rows(&query).await?;
    debug!(table = %table, rows = rows.len(), "key rows fetched");
    Ok(rows
        .into_iter()
        .filter_map(|row| classify_row(adapter, table, database, row))
        .collect())
}

async fn describe(
    catalog: &dyn Catalog,
    adapter: &dyn CatalogDialect,
    table: &str,
    schema: Option<&str>,
) -> Result<TableDescription> {
    let mut columns = match adapter.describe_table_query(table, schema) {
        Some(query) => adapter.parse_describe_rows(&catalog.query_rows(&query).await?),
        None => catalog.describe_table(table, schema).await?,
    };

    let identity = identity_columns(catalog, adapter, table).await?;
    mark_identity_columns(&mut columns, &identity);

    info!(event = "table_described", table = %table, columns = columns.len());
    Ok(TableDescription {
        name: table.to_string(),
        columns,
    })
}

fn mark_identity_columns(columns: &mut [ColumnDescription], identity: &[String]) {
    for column in columns {
        if identity.iter().any(|name| name.eq_ignore_ascii_case(&column.name)) {
            column.autoincrement = true;
        }
    }
}
