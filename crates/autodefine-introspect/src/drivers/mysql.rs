use std::time::Duration;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};

use autodefine_core::{CatalogRow, ColumnDescription, Dialect, Error, Result};

use super::rows::mysql_row;
use crate::catalog::{Catalog, CatalogConfig};

const LIST_TABLES: &str = "SELECT CAST(TABLE_NAME AS CHAR) AS table_name \
FROM information_schema.TABLES \
WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE' \
ORDER BY TABLE_NAME";

const DESCRIBE_TABLE: &str = "SELECT \
CAST(COLUMN_NAME AS CHAR) AS column_name, \
CAST(UPPER(COLUMN_TYPE) AS CHAR) AS data_type, \
CAST(IS_NULLABLE AS CHAR) AS is_nullable, \
CAST(COLUMN_DEFAULT AS CHAR) AS column_default, \
CAST(COLUMN_KEY AS CHAR) AS column_key, \
CAST(COLUMN_COMMENT AS CHAR) AS comment \
FROM information_schema.COLUMNS \
WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
ORDER BY ORDINAL_POSITION";

/// Catalog backed by a MySQL or MariaDB pool.
#[derive(Debug, Clone)]
pub struct MysqlCatalog {
    pool: MySqlPool,
    config: CatalogConfig,
}

impl MysqlCatalog {
    /// Connect with the default pool settings. `mariadb://` URLs are accepted.
    pub async fn connect(url: &str, schema: Option<String>) -> Result<Self> {
        let url = match url.strip_prefix("mariadb://") {
            Some(rest) => format!("mysql://{rest}"),
            None => url.to_string(),
        };
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&url)
            .await
            .map_err(Error::db)?;
        Self::from_pool(pool, schema).await
    }

    pub async fn from_pool(pool: MySqlPool, schema: Option<String>) -> Result<Self> {
        let database = sqlx::query_scalar::<_, Option<String>>("SELECT CAST(DATABASE() AS CHAR)")
            .fetch_one(&pool)
            .await
            .map_err(Error::db)?;
        Ok(Self {
            pool,
            config: CatalogConfig {
                dialect: Dialect::Mysql,
                database,
                schema,
            },
        })
    }
}

#[async_trait]
impl Catalog for MysqlCatalog {
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
        let rows = sqlx::query(DESCRIBE_TABLE)
            .bind(table)
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
        Ok(rows.iter().map(mysql_row).collect())
    }
}

fn map_column(row: &MySqlRow) -> Result<ColumnDescription> {
    let name: String = row.try_get("column_name").map_err(Error::db)?;
    let data_type: Option<String> = row.try_get("data_type").map_err(Error::db)?;
    let is_nullable: Option<String> = row.try_get("is_nullable").map_err(Error::db)?;
    let default: Option<String> = row.try_get("column_default").map_err(Error::db)?;
    let column_key: Option<String> = row.try_get("column_key").map_err(Error::db)?;
    let comment: Option<String> = row.try_get("comment").map_err(Error::db)?;

    Ok(ColumnDescription {
        name,
        data_type: data_type.unwrap_or_default(),
        allow_null: is_nullable.as_deref() == Some("YES"),
        default_value: default.as_deref().and_then(clean_default),
        primary_key: column_key.as_deref() == Some("PRI"),
        comment: comment.filter(|text| !text.is_empty()),
        ..ColumnDescription::default()
    })
}

/// MariaDB 10.2.7+ reports a missing default as the text `NULL` and string
/// literals in quotes; MySQL reports both bare.
fn clean_default(raw: &str) -> Option<String> {
    if raw == "NULL" {
        return None;
    }
    match raw
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        Some(literal) => Some(literal.replace("''", "'")),
        None => Some(raw.to_string()),
    }
}
