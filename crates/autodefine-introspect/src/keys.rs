use autodefine_core::{CatalogRow, ForeignSources, KeyRecord};
use serde_json::Value;

use crate::dialects::{CatalogDialect, RowPredicate};

/// Classify one key-query row for `table`.
///
/// Returns the source column the record belongs to, or `None` when the row
/// names no source column. `database` fills in missing schema fields.
pub fn classify_row(
    adapter: &dyn CatalogDialect,
    table: &str,
    database: Option<&str>,
    row: CatalogRow,
) -> Option<(String, KeyRecord)> {
    let mut fields = adapter.normalize_row(row);

    fill_missing(&mut fields, "source_table", Some(table));
    fill_missing(&mut fields, "source_schema", database);
    fill_missing(&mut fields, "target_schema", database);

    let source_column = text(&fields, "source_column")?;
    let target_column = text(&fields, "target_column").unwrap_or_default();

    // Predicates inspect the row as a JSON value.
    let value = Value::Object(fields.clone());
    let classifier = adapter.classifier();
    let check = |slot: Option<RowPredicate>| slot.is_some_and(|predicate| predicate(&value));

    let references = !source_column.trim().is_empty() && !target_column.trim().is_empty();
    let is_foreign_key = references && classifier.foreign.is_none_or(|predicate| predicate(&value));

    let foreign_sources = is_foreign_key.then(|| ForeignSources {
        source_schema: text(&fields, "source_schema"),
        source_table: text(&fields, "source_table").unwrap_or_else(|| table.to_string()),
        source_column: source_column.clone(),
        target_schema: text(&fields, "target_schema"),
        target_table: text(&fields, "target_table").unwrap_or_default(),
        target_column: target_column.clone(),
    });

    let record = KeyRecord {
        is_foreign_key,
        is_primary_key: check(classifier.primary),
        is_unique: check(classifier.unique),
        is_serial_key: check(classifier.serial),
        foreign_sources,
        fields,
    };

    Some((source_column, record))
}

fn fill_missing(fields: &mut CatalogRow, key: &str, value: Option<&str>) {
    let Some(value) = value else {
        return;
    };
    let missing = fields.get(key).is_none_or(Value::is_null);
    if missing {
        fields.insert(key.to_string(), Value::String(value.to_string()));
    }
}

fn text(fields: &CatalogRow, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::dialects::{MysqlDialect, PostgresDialect, SqliteDialect};

    fn row(value: Value) -> CatalogRow {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn postgres_foreign_key_row() {
        let (column, record) = classify_row(
            &PostgresDialect,
            "users",
            Some("app"),
            row(json!({
                "constraint_name": "users_role_id_fkey",
                "source_schema": "public",
                "source_table": "users",
                "source_column": "role_id",
                "target_schema": "public",
                "target_table": "roles",
                "target_column": "id",
                "contype": "f",
                "extra": null
            })),
        )
        .expect("classified");

        assert_eq!(column, "role_id");
        assert!(record.is_foreign_key);
        assert!(!record.is_primary_key);
        let sources = record.foreign_sources.expect("sources");
        assert_eq!(sources.target_table, "roles");
        assert_eq!(sources.target_column, "id");
        assert_eq!(sources.source_schema.as_deref(), Some("public"));
    }

    #[test]
    fn postgres_serial_primary_key_is_not_foreign() {
        let (column, record) = classify_row(
            &PostgresDialect,
            "users",
            Some("app"),
            row(json!({
                "source_column": "id",
                "target_column": null,
                "target_table": null,
                "contype": "p",
                "extra": "nextval('users_id_seq'::regclass)"
            })),
        )
        .expect("classified");

        assert_eq!(column, "id");
        assert!(record.is_primary_key);
        assert!(record.is_serial_key);
        assert!(!record.is_foreign_key);
        assert!(record.foreign_sources.is_none());
        assert_eq!(record.field_str("source_table"), Some("users"));
        assert_eq!(record.field_str("target_schema"), Some("app"));
    }

    #[test]
    fn sqlite_pragma_row_becomes_foreign_key() {
        let (column, record) = classify_row(
            &SqliteDialect,
            "users",
            None,
            row(json!({"id": 0, "seq": 0, "table": "roles", "from": "role_id", "to": "id"})),
        )
        .expect("classified");

        assert_eq!(column, "role_id");
        assert!(record.is_foreign_key);
        assert_eq!(
            record.foreign_sources.map(|sources| sources.target_table),
            Some("roles".to_string())
        );
    }

    #[test]
    fn mysql_auto_increment_primary_key() {
        let (_, record) = classify_row(
            &MysqlDialect,
            "users",
            Some("app"),
            row(json!({
                "constraint_name": "PRIMARY",
                "source_column": "id",
                "target_table": null,
                "target_column": null,
                "extra": "auto_increment",
                "column_key": "PRI"
            })),
        )
        .expect("classified");

        assert!(record.is_primary_key);
        assert!(record.is_serial_key);
        assert!(!record.is_foreign_key);
        assert!(!record.is_unique);
    }

    #[test]
    fn mysql_unique_column_without_target() {
        let (_, record) = classify_row(
            &MysqlDialect,
            "users",
            Some("app"),
            row(json!({
                "constraint_name": "email_unique",
                "source_column": "email",
                "target_column": null,
                "extra": "",
                "column_key": "uni"
            })),
        )
        .expect("classified");

        assert!(record.is_unique);
        assert!(!record.is_foreign_key);
    }

    #[test]
    fn rows_without_source_column_are_skipped() {
        let classified = classify_row(
            &PostgresDialect,
            "users",
            None,
            row(json!({"contype": "p"})),
        );
        assert!(classified.is_none());
    }

    #[test]
    fn blank_columns_are_not_foreign() {
        let (_, record) = classify_row(
            &SqliteDialect,
            "users",
            None,
            row(json!({"from": "  ", "to": "id", "table": "roles"})),
        )
        .expect("classified");
        assert!(!record.is_foreign_key);
    }
}
