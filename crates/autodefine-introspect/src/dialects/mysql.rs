use autodefine_core::Dialect;
use serde_json::Value;

use super::{CatalogDialect, KeyClassifier, field, field_str};

/// MySQL / MariaDB catalog adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

/// Key usage joined with column metadata so `extra` and `column_key` are
/// available for classification. Without a known database the session's
/// current one is used.
pub fn foreign_keys_query(table: &str, database: Option<&str>) -> String {
    let database = match database {
        Some(database) => format!("'{database}'"),
        None => "DATABASE()".to_string(),
    };
    format!(
        "SELECT \
K.CONSTRAINT_NAME AS constraint_name, \
K.CONSTRAINT_SCHEMA AS source_schema, \
K.TABLE_NAME AS source_table, \
K.COLUMN_NAME AS source_column, \
K.REFERENCED_TABLE_SCHEMA AS target_schema, \
K.REFERENCED_TABLE_NAME AS target_table, \
K.REFERENCED_COLUMN_NAME AS target_column, \
C.EXTRA AS extra, \
C.COLUMN_KEY AS column_key \
FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE AS K \
LEFT JOIN INFORMATION_SCHEMA.COLUMNS AS C \
ON C.TABLE_NAME = K.TABLE_NAME AND C.COLUMN_NAME = K.COLUMN_NAME AND C.TABLE_SCHEMA = K.CONSTRAINT_SCHEMA \
WHERE K.TABLE_NAME = '{table}' AND K.CONSTRAINT_SCHEMA = {database};"
    )
}

pub fn is_foreign_key(row: &Value) -> bool {
    field(row, "extra").is_some_and(|extra| extra.as_str() != Some("auto_increment"))
}

pub fn is_unique(row: &Value) -> bool {
    field_str(row, "column_key").is_some_and(|key| key.eq_ignore_ascii_case("UNI"))
}

pub fn is_primary_key(row: &Value) -> bool {
    field_str(row, "constraint_name") == Some("PRIMARY")
}

pub fn is_serial_key(row: &Value) -> bool {
    field_str(row, "extra") == Some("auto_increment")
}

impl CatalogDialect for MysqlDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Mysql
    }

    fn foreign_keys_query(&self, table: &str, database: Option<&str>) -> Option<String> {
        Some(foreign_keys_query(table, database))
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
