use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A managed timestamp column: `true` enables the default name, a string
/// names a custom column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimestampField {
    Enabled(bool),
    Named(String),
}

impl TimestampField {
    /// Whether `column` is the managed column described by this setting.
    pub fn matches(&self, column: &str, default_name: &str) -> bool {
        match self {
            TimestampField::Enabled(enabled) => *enabled && column == default_name,
            TimestampField::Named(name) => name == column,
        }
    }
}

/// Extra model options applied to every generated table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalOptions {
    pub timestamps: Option<bool>,
    pub created_at: Option<TimestampField>,
    pub updated_at: Option<TimestampField>,
    pub deleted_at: Option<TimestampField>,
    /// Literal `key: value` options appended to each table's option block.
    pub extra: BTreeMap<String, String>,
}

impl AdditionalOptions {
    /// Columns managed by the ORM are left out of the attribute list.
    pub fn is_managed_timestamp(&self, column: &str) -> bool {
        if self.timestamps != Some(true) {
            return false;
        }
        let managed = |field: &Option<TimestampField>, default_name: &str| {
            field
                .as_ref()
                .is_some_and(|field| field.matches(column, default_name))
        };
        managed(&self.created_at, "createdAt")
            || managed(&self.updated_at, "updatedAt")
            || managed(&self.deleted_at, "deletedAt")
    }
}

/// Options that control discovery and model rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Directory generated files are written to.
    pub directory: PathBuf,
    /// Indentation units per nesting level.
    pub indentation: usize,
    /// Indent with spaces instead of tabs.
    pub spaces: bool,
    pub camel_case: bool,
    pub camel_case_for_file_name: bool,
    /// Emit TypeScript models plus `db.d.ts` / `db.tables.ts`.
    pub typescript: bool,
    pub schema: Option<String>,
    /// Only generate these tables (takes precedence over `skip_tables`).
    pub tables: Option<Vec<String>>,
    pub skip_tables: Option<Vec<String>>,
    pub additional: AdditionalOptions,
    /// Maximum number of in-flight catalog queries per phase.
    pub concurrency: usize,
    /// Command run on the output directory after all files are written.
    pub post_process: Option<Vec<String>>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./models"),
            indentation: 1,
            spaces: false,
            camel_case: false,
            camel_case_for_file_name: false,
            typescript: false,
            schema: None,
            tables: None,
            skip_tables: None,
            additional: AdditionalOptions::default(),
            concurrency: 4,
            post_process: None,
        }
    }
}

impl GeneratorOptions {
    /// Parse options from a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let options: GeneratorOptions =
            toml::from_str(content).map_err(|err| Error::InvalidConfig(err.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if matches!(&self.post_process, Some(cmd) if cmd.is_empty()) {
            return Err(Error::InvalidConfig(
                "post_process must name a command".to_string(),
            ));
        }
        Ok(())
    }

    /// One indentation level.
    pub fn indent_unit(&self) -> String {
        let ch = if self.spaces { " " } else { "\t" };
        ch.repeat(self.indentation)
    }

    /// Apply the `tables` / `skip_tables` filters, preserving input order.
    pub fn filter_tables(&self, discovered: Vec<String>) -> Vec<String> {
        if let Some(only) = &self.tables {
            return discovered
                .into_iter()
                .filter(|table| only.contains(table))
                .collect();
        }
        if let Some(skip) = &self.skip_tables {
            return discovered
                .into_iter()
                .filter(|table| !skip.contains(table))
                .collect();
        }
        discovered
    }
}
