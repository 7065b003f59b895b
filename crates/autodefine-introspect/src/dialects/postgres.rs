use autodefine_core::Dialect;
use serde_json::Value;

use super::{CatalogDialect, KeyClassifier, field_str};

/// PostgreSQL catalog adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

/// One row per constraint on `table` with the first source/target column,
/// the constraint type code and the source column's default expression.
pub fn foreign_keys_query(table: &str) -> String {
    format!(
        "SELECT \
o.conname AS constraint_name, \
(SELECT nspname FROM pg_namespace WHERE oid = m.relnamespace) AS source_schema, \
m.relname AS source_table, \
(SELECT a.attname FROM pg_attribute a WHERE a.attrelid = m.oid AND a.attnum = o.conkey[1] AND a.attisdropped = false) AS source_column, \
(SELECT nspname FROM pg_namespace WHERE oid = f.relnamespace) AS target_schema, \
f.relname AS target_table, \
(SELECT a.attname FROM pg_attribute a WHERE a.attrelid = f.oid AND a.attnum = o.confkey[1] AND a.attisdropped = false) AS target_column, \
o.contype::text AS contype, \
(SELECT pg_get_expr(d.adbin, d.adrelid) FROM pg_catalog.pg_attribute a \
LEFT JOIN pg_catalog.pg_attrdef d ON (a.attrelid, a.attnum) = (d.adrelid, d.adnum) \
WHERE NOT a.attisdropped AND a.attnum > 0 AND a.attrelid = o.conrelid AND a.attnum = o.conkey[1] LIMIT 1) AS extra \
FROM pg_constraint o \
LEFT JOIN pg_class f ON f.oid = o.confrelid \
LEFT JOIN pg_class m ON m.oid = o.conrelid \
WHERE o.conrelid = (SELECT oid FROM pg_class WHERE relname = '{table}' LIMIT 1)"
    )
}

/// Base tables of `schema`, without PostGIS bookkeeping.
pub fn list_tables_query(schema: &str) -> String {
    format!(
        "SELECT table_name FROM information_schema.tables \
WHERE table_schema = '{schema}' AND table_type LIKE '%TABLE' AND table_name != 'spatial_ref_sys';"
    )
}

pub fn is_foreign_key(row: &Value) -> bool {
    field_str(row, "contype") == Some("f")
}

pub fn is_unique(row: &Value) -> bool {
    field_str(row, "contype") == Some("u")
}

pub fn is_primary_key(row: &Value) -> bool {
    field_str(row, "contype") == Some("p")
}

/// Primary keys backed by a `nextval('<name>_seq'::regclass)` default.
pub fn is_serial_key(row: &Value) -> bool {
    is_primary_key(row)
        && field_str(row, "extra").is_some_and(|extra| {
            extra.starts_with("nextval") && extra.contains("_seq") && extra.contains("::regclass")
        })
}

impl CatalogDialect for PostgresDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn foreign_keys_query(&self, table: &str, _database: Option<&str>) -> Option<String> {
        Some(foreign_keys_query(table))
    }

    /// Only an explicit schema needs enumeration; otherwise the connection's
    /// search path decides.
    fn list_tables_query(&self, schema: Option<&str>) -> Option<String> {
        schema.map(list_tables_query)
    }

    fn classifier(&self) -> KeyClassifier {
        KeyClassifier {
            foreign: Some(is_foreign_key),
            primary: Some(is_primary_key),
            unique: Some(is_unique),
            serial: Some(is_serial_key),
        }
    }
}
