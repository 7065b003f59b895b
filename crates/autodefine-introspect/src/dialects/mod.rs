//! Per-dialect catalog queries and key classification.
//!
//! Every dialect builds its query text in exactly one place and exposes its
//! row predicates through a [`KeyClassifier`]. A predicate slot left empty
//! means the check does not apply to that backend.

use autodefine_core::{CatalogRow, ColumnDescription, Dialect};
use serde_json::Value;

pub mod mssql;
pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod sqlite;

pub use mssql::MssqlDialect;
pub use mysql::MysqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

/// Pure predicate over a catalog row. Must return `false` for `null`,
/// non-objects and rows missing the inspected field.
pub type RowPredicate = fn(&Value) -> bool;

/// Optional classification slots for one dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyClassifier {
    pub foreign: Option<RowPredicate>,
    pub primary: Option<RowPredicate>,
    pub unique: Option<RowPredicate>,
    pub serial: Option<RowPredicate>,
}

/// Catalog capabilities a backend exposes for key discovery.
pub trait CatalogDialect: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// SQL listing key metadata for `table`, scoped to `database` when the
    /// backend needs it and one is known. `None` when the backend has no
    /// foreign-key query, in which case key discovery is skipped.
    fn foreign_keys_query(&self, _table: &str, _database: Option<&str>) -> Option<String> {
        None
    }

    /// SQL listing user tables (one `table_name` per row) for backends that
    /// need explicit schema enumeration. `None` defers to
    /// [`Catalog::list_tables`](crate::Catalog::list_tables).
    fn list_tables_query(&self, _schema: Option<&str>) -> Option<String> {
        None
    }

    /// SQL listing identity-generated columns of `table` (one `column_name`
    /// per row).
    fn identity_columns_query(&self, _table: &str) -> Option<String> {
        None
    }

    /// SQL describing the columns of `table` for backends whose generic
    /// description lacks lengths or precision. Rows are read back through
    /// [`parse_describe_rows`](CatalogDialect::parse_describe_rows).
    fn describe_table_query(&self, _table: &str, _schema: Option<&str>) -> Option<String> {
        None
    }

    fn parse_describe_rows(&self, _rows: &[CatalogRow]) -> Vec<ColumnDescription> {
        Vec::new()
    }

    fn classifier(&self) -> KeyClassifier;

    /// Rename driver-specific row keys to the shared vocabulary
    /// (`source_column`, `target_table`, `target_column`).
    fn normalize_row(&self, row: CatalogRow) -> CatalogRow {
        row
    }
}

static MYSQL: MysqlDialect = MysqlDialect;
static POSTGRES: PostgresDialect = PostgresDialect;
static SQLITE: SqliteDialect = SqliteDialect;
static MSSQL: MssqlDialect = MssqlDialect;
static ORACLE: OracleDialect = OracleDialect;

/// Adapter registered for `dialect`.
pub fn adapter_for(dialect: Dialect) -> &'static dyn CatalogDialect {
    match dialect {
        Dialect::Mysql => &MYSQL,
        Dialect::Postgres => &POSTGRES,
        Dialect::Sqlite => &SQLITE,
        Dialect::Mssql => &MSSQL,
        Dialect::Oracle => &ORACLE,
    }
}

pub(crate) fn field<'a>(row: &'a Value, key: &str) -> Option<&'a Value> {
    row.as_object()?.get(key)
}

pub(crate) fn field_str<'a>(row: &'a Value, key: &str) -> Option<&'a str> {
    field(row, key)?.as_str()
}

/// Loose truthiness for flags drivers report as bools, numbers or strings.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
