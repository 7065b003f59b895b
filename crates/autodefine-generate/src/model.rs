//! Per-table model module rendering.

use autodefine_core::{
    ColumnDescription, Dialect, ForeignKeyIndex, GeneratorOptions, KeyRecord, TableDescription,
    camel_case,
};

use crate::defaults::{default_value_expression, js_string};
use crate::extensions::{OptionRegistry, OptionRequest};
use crate::types::{data_type_expression, typescript_type};

/// One attribute as it appears in the TypeScript declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedAttribute {
    pub name: String,
    pub ts_type: &'static str,
    pub optional: bool,
}

/// Rendered source for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedModel {
    /// Physical table name.
    pub table: String,
    /// Name passed to `sequelize.define`.
    pub model_name: String,
    /// File name without extension.
    pub file_stem: String,
    pub source: String,
    pub attributes: Vec<TypedAttribute>,
}

/// Renders `sequelize.define` modules from discovered metadata.
#[derive(Debug)]
pub struct ModelGenerator<'a> {
    options: &'a GeneratorOptions,
    dialect: Dialect,
    registry: OptionRegistry,
    indent: String,
}

impl<'a> ModelGenerator<'a> {
    /// Generator with the built-in option providers.
    pub fn new(options: &'a GeneratorOptions, dialect: Dialect) -> Self {
        Self::with_registry(options, dialect, OptionRegistry::with_defaults())
    }

    pub fn with_registry(
        options: &'a GeneratorOptions,
        dialect: Dialect,
        registry: OptionRegistry,
    ) -> Self {
        Self {
            options,
            dialect,
            registry,
            indent: options.indent_unit(),
        }
    }

    pub fn registry_mut(&mut self) -> &mut OptionRegistry {
        &mut self.registry
    }

    /// Render every table in order.
    pub fn render_all(
        &self,
        tables: &[TableDescription],
        foreign_keys: &ForeignKeyIndex,
    ) -> Vec<RenderedModel> {
        tables
            .iter()
            .map(|table| self.render_table(table, foreign_keys))
            .collect()
    }

    pub fn render_table(
        &self,
        table: &TableDescription,
        foreign_keys: &ForeignKeyIndex,
    ) -> RenderedModel {
        let sp = self.indent.as_str();
        let model_name = if self.options.camel_case {
            camel_case(&table.name)
        } else {
            table.name.clone()
        };
        let file_stem = if self.options.camel_case_for_file_name {
            camel_case(&table.name)
        } else {
            table.name.clone()
        };

        let mut blocks = Vec::new();
        let mut attributes = Vec::new();
        for column in &table.columns {
            if self.options.additional.is_managed_timestamp(&column.name) {
                continue;
            }
            let mut column = column.clone();
            column.foreign_key = foreign_keys.get(&table.name, &column.name).cloned();

            let (block, attribute) = self.render_column(&column);
            blocks.push(block);
            attributes.push(attribute);
        }

        let mut source = if self.options.typescript {
            typescript_header(self.options.indentation, sp, &model_name)
        } else {
            javascript_header(self.options.indentation, sp, &model_name)
        };
        source.push_str(&blocks.join(",\n"));
        source.push('\n');
        source.push_str(&format!("{sp}}}, {{\n{sp}{sp}tableName: '{}'", table.name));

        let request = OptionRequest {
            table: &table.name,
            columns: &table.columns,
            options: self.options,
            spaces: sp,
            dialect: self.dialect,
        };
        for option in self.registry.render(&request) {
            source.push_str(&format!(",\n{sp}{sp}{option}"));
        }
        source.push_str(&format!("\n{sp}}});\n}};\n"));

        RenderedModel {
            table: table.name.clone(),
            model_name,
            file_stem,
            source,
            attributes,
        }
    }

    fn render_column(&self, column: &ColumnDescription) -> (String, TypedAttribute) {
        let sp = self.indent.as_str();
        let record: Option<&KeyRecord> = column.foreign_key.as_ref();
        let is_serial = record.is_some_and(|record| record.is_serial_key);
        let field_name = if self.options.camel_case {
            camel_case(&column.name)
        } else {
            column.name.clone()
        };

        let type_expression = data_type_expression(column, self.dialect);
        let mut lines = vec![
            format!("type: {type_expression}"),
            format!("allowNull: {}", column.allow_null),
        ];

        if let Some(default) = default_value_expression(column, self.dialect, is_serial) {
            lines.push(format!("defaultValue: {default}"));
        }

        if column.primary_key && record.is_none_or(|record| record.is_primary_key) {
            lines.push("primaryKey: true".to_string());
        }

        let references = record
            .filter(|record| record.is_foreign_key)
            .and_then(|record| record.foreign_sources.as_ref());
        if is_serial || column.autoincrement {
            lines.push("autoIncrement: true".to_string());
        } else if let Some(sources) = references {
            lines.push(format!(
                "references: {{\n{sp}{sp}{sp}{sp}model: {},\n{sp}{sp}{sp}{sp}key: {}\n{sp}{sp}{sp}}}",
                js_string(&sources.target_table),
                js_string(&sources.target_column)
            ));
        }

        if record.is_some_and(|record| record.is_unique) {
            lines.push("unique: true".to_string());
        }

        if let Some(comment) = column.comment.as_deref().filter(|text| !text.is_empty()) {
            lines.push(format!("comment: {}", js_string(comment)));
        }

        if self.options.camel_case {
            lines.push(format!("field: {}", js_string(&column.name)));
        }

        let body: Vec<String> = lines
            .iter()
            .map(|line| format!("{sp}{sp}{sp}{line}"))
            .collect();
        let block = format!("{sp}{sp}{field_name}: {{\n{}\n{sp}{sp}}}", body.join(",\n"));

        let attribute = TypedAttribute {
            name: field_name,
            ts_type: typescript_type(&type_expression),
            optional: column.allow_null,
        };
        (block, attribute)
    }
}

fn javascript_header(indentation: usize, sp: &str, model_name: &str) -> String {
    format!(
        "/* jshint indent: {indentation} */\n\n\
module.exports = function(sequelize, DataTypes) {{\n\
{sp}return sequelize.define('{model_name}', {{\n"
    )
}

fn typescript_header(indentation: usize, sp: &str, model_name: &str) -> String {
    format!(
        "/* jshint indent: {indentation} */\n\
// tslint:disable\n\
import * as sequelize from 'sequelize';\n\
import {{DataTypes}} from 'sequelize';\n\
import {{{model_name}Instance, {model_name}Attribute}} from './db';\n\n\
module.exports = function(sequelize: sequelize.Sequelize, DataTypes: DataTypes) {{\n\
{sp}return sequelize.define<{model_name}Instance, {model_name}Attribute>('{model_name}', {{\n"
    )
}
