use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Untyped row returned by a dialect-specific catalog query.
///
/// Field names differ per dialect (`contype`, `extra`, `constraint_type`, ...),
/// so rows are kept as a JSON object and interpreted by the dialect that
/// produced them.
pub type CatalogRow = Map<String, Value>;

/// Column metadata as reported by the catalog, plus any key facts merged in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescription {
    pub name: String,
    /// Raw catalog type string (e.g. `INT(11) UNSIGNED`, `CHARACTER VARYING(255)`).
    pub data_type: String,
    pub allow_null: bool,
    pub default_value: Option<String>,
    pub primary_key: bool,
    /// Enum labels for `USER-DEFINED` postgres types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub special: Vec<String>,
    pub data_length: Option<i64>,
    pub data_precision: Option<i64>,
    pub data_scale: Option<i64>,
    pub comment: Option<String>,
    /// Identity column discovered through the oracle identity lookup.
    #[serde(default)]
    pub autoincrement: bool,
    /// Key record attached during rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<KeyRecord>,
}

impl ColumnDescription {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            allow_null: true,
            ..Self::default()
        }
    }
}

/// A table and its columns in catalog enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableDescription {
    pub name: String,
    pub columns: Vec<ColumnDescription>,
}

impl TableDescription {
    pub fn column(&self, name: &str) -> Option<&ColumnDescription> {
        self.columns.iter().find(|col| col.name == name)
    }
}

/// All described tables, in table enumeration order.
pub type TableMetadata = Vec<TableDescription>;

/// Where a foreign key points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignSources {
    pub source_schema: Option<String>,
    pub source_table: String,
    pub source_column: String,
    pub target_schema: Option<String>,
    pub target_table: String,
    pub target_column: String,
}

/// Classified key facts for one source column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Raw row fields; later rows for the same column overwrite earlier ones.
    pub fields: CatalogRow,
    pub is_foreign_key: bool,
    pub is_primary_key: bool,
    pub is_unique: bool,
    pub is_serial_key: bool,
    pub foreign_sources: Option<ForeignSources>,
}

impl KeyRecord {
    /// Fold another record for the same column into this one.
    ///
    /// Flags accumulate; fields and foreign sources take the newer value.
    pub fn merge(&mut self, other: KeyRecord) {
        self.fields.extend(other.fields);
        self.is_foreign_key |= other.is_foreign_key;
        self.is_primary_key |= other.is_primary_key;
        self.is_unique |= other.is_unique;
        self.is_serial_key |= other.is_serial_key;
        if other.foreign_sources.is_some() {
            self.foreign_sources = other.foreign_sources;
        }
    }

    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Table name -> source column -> merged key record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyIndex {
    tables: BTreeMap<String, BTreeMap<String, KeyRecord>>,
}

impl ForeignKeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, merging with any existing record for the same column.
    pub fn insert(&mut self, table: &str, column: &str, record: KeyRecord) {
        let columns = self.tables.entry(table.to_string()).or_default();
        match columns.get_mut(column) {
            Some(existing) => existing.merge(record),
            None => {
                columns.insert(column.to_string(), record);
            }
        }
    }

    pub fn get(&self, table: &str, column: &str) -> Option<&KeyRecord> {
        self.tables.get(table).and_then(|columns| columns.get(column))
    }

    pub fn table(&self, table: &str) -> Option<&BTreeMap<String, KeyRecord>> {
        self.tables.get(table)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
