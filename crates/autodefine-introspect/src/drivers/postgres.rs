use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use autodefine_core::{CatalogRow, ColumnDescription, Dialect, Error, Result};

use super::rows::pg_row;
use crate::catalog::{Catalog, CatalogConfig};
use crate::dialects::postgres::list_tables_query;

const DESCRIBE_TABLE: &str = r#"
SELECT
  c.column_name::text AS column_name,
  UPPER(
    (CASE WHEN c.udt_name = 'hstore' THEN c.udt_name ELSE c.data_type END)::text
    || (CASE WHEN c.character_maximum_length IS NOT NULL
          THEN '(' || c.character_maximum_length || ')' ELSE '' END)
  ) AS data_type,
  c.is_nullable::text AS is_nullable,
  c.column_default::text AS column_default,
  pk.constraint_type::text AS constraint_type,
  (SELECT array_agg(e.enumlabel::text ORDER BY e.enumsortorder)
     FROM pg_catalog.pg_type t
     JOIN pg_catalog.pg_enum e ON t.oid = e.enumtypid
    WHERE t.typname = c.udt_name) AS special,
  (SELECT pgd.description
     FROM pg_catalog.pg_statio_all_tables st
     JOIN pg_catalog.pg_description pgd ON pgd.objoid = st.relid
    WHERE pgd.objsubid = c.ordinal_position
      AND st.relname = c.table_name
      AND st.schemaname = c.table_schema) AS comment
FROM information_schema.columns c
LEFT JOIN (
  SELECT tc.table_schema, tc.table_name, cu.column_name, tc.constraint_type
  FROM information_schema.table_constraints tc
  JOIN information_schema.key_column_usage cu
    ON tc.table_schema = cu.table_schema
   AND tc.table_name = cu.table_name
   AND tc.constraint_name = cu.constraint_name
  WHERE tc.constraint_type = 'PRIMARY KEY'
) pk
  ON pk.table_schema = c.table_schema
 AND pk.table_name = c.table_name
 AND pk.column_name = c.column_name
WHERE c.table_name = $1 AND c.table_schema = $2
ORDER BY c.ordinal_position
"#;

/// Catalog backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
    config: CatalogConfig,
}

impl PostgresCatalog {
    /// Connect with the default pool settings.
    pub async fn connect(url: &str, schema: Option<String>) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect(url)
            .await
            .map_err(Error::db)?;
        Self::from_pool(pool, schema).await
    }

    /// Wrap a pre-configured pool.
    pub async fn from_pool(pool: PgPool, schema: Option<String>) -> Result<Self> {
        let database = sqlx::query_scalar::<_, String>("select current_database()")
            .fetch_one(&pool)
            .await
            .map_err(Error::db)?;
        Ok(Self {
            pool,
            config: CatalogConfig {
                dialect: Dialect::Postgres,
                database: Some(database),
                schema,
            },
        })
    }
}

#[async_trait]
impl Catalog for PostgresCatalog {
    fn config(&self) -> &CatalogConfig {
        &self.config
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        let schema = self.config.schema.as_deref().unwrap_or("public");
        let rows = sqlx::query(&list_tables_query(schema))
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
        schema: Option<&str>,
    ) -> Result<Vec<ColumnDescription>> {
        let schema = schema
            .or(self.config.schema.as_deref())
            .unwrap_or("public");
        let rows = sqlx::query(DESCRIBE_TABLE)
            .bind(table)
            .bind(schema)
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
        Ok(rows.iter().map(pg_row).collect())
    }
}

fn map_column(row: &PgRow) -> Result<ColumnDescription> {
    let name: String = row.try_get("column_name").map_err(Error::db)?;
    let data_type: Option<String> = row.try_get("data_type").map_err(Error::db)?;
    let is_nullable: Option<String> = row.try_get("is_nullable").map_err(Error::db)?;
    let default: Option<String> = row.try_get("column_default").map_err(Error::db)?;
    let constraint: Option<String> = row.try_get("constraint_type").map_err(Error::db)?;
    let special: Option<Vec<String>> = row.try_get("special").map_err(Error::db)?;
    let comment: Option<String> = row.try_get("comment").map_err(Error::db)?;

    Ok(ColumnDescription {
        name,
        data_type: data_type.unwrap_or_default(),
        allow_null: is_nullable.as_deref() == Some("YES"),
        default_value: default.and_then(|value| clean_default(&value)),
        primary_key: constraint.as_deref() == Some("PRIMARY KEY"),
        special: special.unwrap_or_default(),
        comment,
        ..ColumnDescription::default()
    })
}

/// Strip quoting and type casts from a catalog default
/// (`'active'::character varying` becomes `active`). Sequence defaults keep
/// their `::regclass` cast.
pub(crate) fn clean_default(raw: &str) -> Option<String> {
    let unquoted = raw.replace('\'', "");
    let value = match unquoted.split_once("::") {
        Some((head, tail)) if !tail.eq_ignore_ascii_case("regclass)") => head.to_string(),
        _ => unquoted,
    };
    if value.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_lose_casts_and_quotes() {
        assert_eq!(
            clean_default("'active'::character varying").as_deref(),
            Some("active")
        );
        assert_eq!(
            clean_default("nextval('users_id_seq'::regclass)").as_deref(),
            Some("nextval(users_id_seq::regclass)")
        );
        assert_eq!(clean_default("CURRENT_TIMESTAMP").as_deref(), Some("CURRENT_TIMESTAMP"));
        assert_eq!(clean_default("NULL::character varying"), None);
    }
}
