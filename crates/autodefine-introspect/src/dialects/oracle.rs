//! Oracle has no foreign-key query; identity columns come from
//! `USER_TAB_IDENTITY_COLS` and table descriptions from a dedicated query
//! that also reports lengths, precision and scale. Table and column names
//! are reported lower-cased.

use std::collections::HashSet;

use autodefine_core::{CatalogRow, ColumnDescription, Dialect};
use serde_json::Value;

use super::{CatalogDialect, KeyClassifier};

/// Oracle catalog adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleDialect;

/// Tables owned by non-maintained users, scoped to `schema` or the session
/// user.
pub fn list_tables_query(schema: Option<&str>) -> String {
    let owner = match schema {
        Some(schema) => format!("'{schema}'"),
        None => "(SELECT SYS_CONTEXT ('USERENV', 'SESSION_USER') FROM DUAL)".to_string(),
    };
    format!(
        "SELECT owner AS table_schema, LOWER(table_name) AS table_name, 0 AS lvl FROM all_tables \
WHERE OWNER IN (SELECT USERNAME AS \"schema_name\" FROM ALL_USERS WHERE ORACLE_MAINTAINED = 'N') \
AND OWNER = {owner} AND table_name != 'SEQUELIZEMETA'"
    )
}

pub fn identity_columns_query(table: &str) -> String {
    format!(
        "SELECT TABLE_NAME, LOWER(COLUMN_NAME) AS column_name, GENERATION_TYPE, IDENTITY_OPTIONS \
FROM USER_TAB_IDENTITY_COLS WHERE TABLE_NAME = '{}'",
        table.to_uppercase()
    )
}

/// Column description with lengths; primary-key membership is inferred from
/// `%PK%` constraint names.
pub fn describe_table_query(table: &str, schema: Option<&str>) -> String {
    let owner = match schema {
        Some(schema) => format!("WHERE (atc.OWNER = UPPER('{schema}') OR atc.OWNER = '{schema}') "),
        None => "WHERE atc.OWNER = (SELECT USER FROM DUAL) ".to_string(),
    };
    format!(
        "SELECT atc.COLUMN_NAME, atc.DATA_TYPE, atc.DATA_LENGTH, atc.CHAR_LENGTH, atc.DEFAULT_LENGTH, \
atc.DATA_PRECISION, atc.DATA_SCALE, atc.NULLABLE, \
CASE WHEN ucc.CONSTRAINT_NAME LIKE '%PK%' THEN 'PRIMARY' ELSE '' END AS \"PRIMARY\" \
FROM all_tab_columns atc \
LEFT OUTER JOIN all_cons_columns ucc ON (atc.table_name = ucc.table_name AND atc.COLUMN_NAME = ucc.COLUMN_NAME) \
{owner}AND (atc.TABLE_NAME = UPPER('{table}') OR atc.TABLE_NAME = '{table}') \
ORDER BY \"PRIMARY\", atc.COLUMN_NAME"
    )
}

/// Turn `describe_table_query` rows into column descriptions.
///
/// Column names are lower-cased; the first row per column wins.
pub fn parse_describe_rows(rows: &[CatalogRow]) -> Vec<ColumnDescription> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();

    for row in rows {
        let Some(name) = text(row, "COLUMN_NAME") else {
            continue;
        };
        let name = name.to_lowercase();
        if !seen.insert(name.clone()) {
            continue;
        }

        let data_type = text(row, "DATA_TYPE").unwrap_or_default().to_uppercase();
        let (data_length, data_precision, data_scale) = if data_type == "NUMBER" {
            let precision = number(row, "DATA_PRECISION");
            (precision, precision, number(row, "DATA_SCALE"))
        } else if data_type.contains("VARCHAR") {
            (number(row, "CHAR_LENGTH"), None, Some(0))
        } else {
            (number(row, "DATA_LENGTH"), None, Some(0))
        };

        columns.push(ColumnDescription {
            name,
            data_type,
            allow_null: text(row, "NULLABLE").as_deref() != Some("N"),
            default_value: None,
            primary_key: text(row, "PRIMARY").as_deref() == Some("PRIMARY"),
            data_length,
            data_precision,
            data_scale,
            ..ColumnDescription::default()
        });
    }

    columns
}

fn lookup<'a>(row: &'a CatalogRow, key: &str) -> Option<&'a Value> {
    row.get(key).or_else(|| {
        row.iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    })
}

fn text(row: &CatalogRow, key: &str) -> Option<String> {
    match lookup(row, key)? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

fn number(row: &CatalogRow, key: &str) -> Option<i64> {
    match lookup(row, key)? {
        Value::Number(value) => value.as_i64(),
        Value::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}

pub fn is_serial_key(_row: &Value) -> bool {
    false
}

impl CatalogDialect for OracleDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Oracle
    }

    fn list_tables_query(&self, schema: Option<&str>) -> Option<String> {
        Some(list_tables_query(schema))
    }

    fn identity_columns_query(&self, table: &str) -> Option<String> {
        Some(identity_columns_query(table))
    }

    fn describe_table_query(&self, table: &str, schema: Option<&str>) -> Option<String> {
        Some(describe_table_query(table, schema))
    }

    fn parse_describe_rows(&self, rows: &[CatalogRow]) -> Vec<ColumnDescription> {
        parse_describe_rows(rows)
    }

    fn classifier(&self) -> KeyClassifier {
        KeyClassifier {
            serial: Some(is_serial_key),
            ..KeyClassifier::default()
        }
    }
}
