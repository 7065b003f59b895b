use autodefine_core::Dialect;
use serde_json::Value;

use super::{CatalogDialect, KeyClassifier, field, field_str, is_truthy};

/// SQL Server catalog adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlDialect;

/// Wrap `value` in `tick`, dropping any embedded ticks.
pub fn add_ticks(value: &str, tick: char) -> String {
    let stripped: String = value.chars().filter(|ch| *ch != tick).collect();
    format!("{tick}{stripped}{tick}")
}

pub fn foreign_keys_query(table: &str) -> String {
    format!(
        "SELECT \
ccu.table_name AS source_table, \
ccu.constraint_name AS constraint_name, \
ccu.column_name AS source_column, \
kcu.table_name AS target_table, \
kcu.column_name AS target_column, \
tc.constraint_type AS constraint_type, \
c.is_identity AS is_identity \
FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc \
INNER JOIN INFORMATION_SCHEMA.CONSTRAINT_COLUMN_USAGE ccu \
ON ccu.CONSTRAINT_NAME = tc.CONSTRAINT_NAME \
LEFT JOIN INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS rc \
ON ccu.CONSTRAINT_NAME = rc.CONSTRAINT_NAME \
LEFT JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu \
ON kcu.CONSTRAINT_NAME = rc.UNIQUE_CONSTRAINT_NAME AND tc.CONSTRAINT_TYPE = 'FOREIGN KEY' \
INNER JOIN sys.COLUMNS c \
ON c.name = ccu.column_name \
AND c.object_id = OBJECT_ID(ccu.table_name) \
WHERE ccu.table_name = {}",
        add_ticks(table, '\'')
    )
}

pub fn is_foreign_key(row: &Value) -> bool {
    field_str(row, "constraint_type") == Some("FOREIGN KEY")
}

pub fn is_primary_key(row: &Value) -> bool {
    field_str(row, "constraint_type") == Some("PRIMARY KEY")
}

pub fn is_serial_key(row: &Value) -> bool {
    is_primary_key(row) && field(row, "is_identity").is_some_and(is_truthy)
}

impl CatalogDialect for MssqlDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Mssql
    }

    fn foreign_keys_query(&self, table: &str, _database: Option<&str>) -> Option<String> {
        Some(foreign_keys_query(table))
    }

    fn classifier(&self) -> KeyClassifier {
        KeyClassifier {
            foreign: Some(is_foreign_key),
            primary: Some(is_primary_key),
            unique: None,
            serial: Some(is_serial_key),
        }
    }
}
