use std::str::FromStr;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};

use autodefine_core::{CatalogRow, ColumnDescription, Dialect, Error, Result};

use super::rows::sqlite_row;
use crate::catalog::{Catalog, CatalogConfig};

const LIST_TABLES: &str = "SELECT name AS table_name FROM sqlite_master \
WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY rowid";

/// Catalog backed by a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
    config: CatalogConfig,
}

impl SqliteCatalog {
    /// Open an existing database read-only.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(Error::db)?
            .read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(Error::db)?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            config: CatalogConfig {
                dialect: Dialect::Sqlite,
                database: None,
                schema: None,
            },
        }
    }
}

#[async_trait]
impl Catalog for SqliteCatalog {
    fn config(&self) -> &CatalogConfig {
        &self.config
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(LIST_TABLES)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::db)?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("table_name").map_err(Error::db))
            .collect()
    }

    async fn describe_table(
        &self,
        table: &str,
        _schema: Option<&str>,
    ) -> Result<Vec<ColumnDescription>> {
        let sql = format!("PRAGMA table_info(`{table}`)");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::db)?;
        rows.iter().map(map_column).collect()
    }

    async fn query_rows(&self, sql: &str) -> Result<Vec<CatalogRow>> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::db)?;
        Ok(rows.iter().map(sqlite_row).collect())
    }
}

fn map_column(row: &SqliteRow) -> Result<ColumnDescription> {
    let name: String = row.try_get("name").map_err(Error::db)?;
    let data_type: Option<String> = row.try_get("type").map_err(Error::db)?;
    let not_null: i64 = row.try_get("notnull").map_err(Error::db)?;
    let default: Option<String> = row.try_get("dflt_value").map_err(Error::db)?;
    let pk: i64 = row.try_get("pk").map_err(Error::db)?;

    Ok(ColumnDescription {
        name,
        data_type: data_type.unwrap_or_default().to_uppercase(),
        allow_null: not_null == 0,
        default_value: default.and_then(|value| clean_default(&value)),
        primary_key: pk != 0,
        ..ColumnDescription::default()
    })
}

/// SQLite reports defaults as SQL text; string literals keep their quotes.
fn clean_default(raw: &str) -> Option<String> {
    let value = raw.replace('\'', "");
    if value.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(value)
    }
}
