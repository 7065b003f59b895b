use autodefine_core::{CatalogRow, Dialect};
use serde_json::Value;

use super::{CatalogDialect, KeyClassifier, field};

/// SQLite catalog adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

/// `PRAGMA foreign_key_list` rows expose `from`, `to` and `table`.
pub fn foreign_keys_query(table: &str) -> String {
    format!("PRAGMA foreign_key_list(`{table}`);")
}

pub fn is_primary_key(row: &Value) -> bool {
    field(row, "primaryKey") == Some(&Value::Bool(true))
}

impl CatalogDialect for SqliteDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn foreign_keys_query(&self, table: &str, _database: Option<&str>) -> Option<String> {
        Some(foreign_keys_query(table))
    }

    fn classifier(&self) -> KeyClassifier {
        KeyClassifier {
            primary: Some(is_primary_key),
            ..KeyClassifier::default()
        }
    }

    fn normalize_row(&self, row: CatalogRow) -> CatalogRow {
        row.into_iter()
            .map(|(key, value)| {
                let key = match key.as_str() {
                    "from" => "source_column".to_string(),
                    "to" => "target_column".to_string(),
                    "table" => "target_table".to_string(),
                    _ => key,
                };
                (key, value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn primary_key_requires_literal_true() {
        assert!(!is_primary_key(&Value::Null));
        assert!(!is_primary_key(&json!({"some": "value"})));
        assert!(!is_primary_key(&json!({"primaryKey": false})));
        assert!(!is_primary_key(&json!({"primaryKey": 1})));
        assert!(is_primary_key(&json!({"primaryKey": true})));
    }

    #[test]
    fn pragma_keys_are_renamed() {
        let row = json!({"id": 0, "seq": 0, "table": "roles", "from": "role_id", "to": "id"});
        let row = SqliteDialect.normalize_row(row.as_object().cloned().unwrap_or_default());
        assert_eq!(row.get("source_column"), Some(&json!("role_id")));
        assert_eq!(row.get("target_column"), Some(&json!("id")));
        assert_eq!(row.get("target_table"), Some(&json!("roles")));
        assert!(row.get("from").is_none());
    }
}
