//! `db.d.ts` and `db.tables.ts` companions for TypeScript output.

use crate::model::RenderedModel;

/// Attribute, instance and model interfaces for every table.
pub fn definitions_file(models: &[RenderedModel], sp: &str) -> String {
    let mut out = String::from("// tslint:disable\nimport * as Sequelize from 'sequelize';\n\n");
    for model in models {
        let name = &model.model_name;
        out.push_str(&format!("\n// table: {}\n", model.table));
        out.push_str(&format!("export interface {name}Attribute {{"));
        for attribute in &model.attributes {
            let optional = if attribute.optional { "?" } else { "" };
            out.push_str(&format!(
                "\n{sp}{}{optional}: {};",
                attribute.name, attribute.ts_type
            ));
        }
        out.push_str("\n}\n");
        out.push_str(&format!(
            "export interface {name}Instance extends Sequelize.Instance<{name}Attribute>, {name}Attribute {{ }}\n"
        ));
        out.push_str(&format!(
            "export interface {name}Model extends Sequelize.Model<{name}Instance, {name}Attribute> {{ }}\n"
        ));
    }
    out
}

/// `ITables` registry and the `getModels` loader.
pub fn tables_file(models: &[RenderedModel], sp: &str) -> String {
    let mut out = String::from(
        "// tslint:disable\n\
import * as path from 'path';\n\
import * as sequelize from 'sequelize';\n\
import * as def from './db';\n\n\
export interface ITables {\n",
    );
    for model in models {
        let name = &model.model_name;
        out.push_str(&format!("{sp}{name}: def.{name}Model;\n"));
    }
    out.push_str("}\n\n");
    out.push_str("export const getModels = function(seq: sequelize.Sequelize): ITables {\n");
    out.push_str(&format!("{sp}const tables: ITables = {{\n"));
    for model in models {
        out.push_str(&format!(
            "{sp}{sp}{}: seq.import(path.join(__dirname, './{}')),\n",
            model.model_name, model.file_stem
        ));
    }
    out.push_str(&format!("{sp}}};\n{sp}return tables;\n}};\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypedAttribute;

    fn users() -> RenderedModel {
        RenderedModel {
            table: "users".into(),
            model_name: "users".into(),
            file_stem: "users".into(),
            source: String::new(),
            attributes: vec![
                TypedAttribute {
                    name: "id".into(),
                    ts_type: "number",
                    optional: false,
                },
                TypedAttribute {
                    name: "email".into(),
                    ts_type: "string",
                    optional: true,
                },
            ],
        }
    }

    #[test]
    fn definitions_mark_nullable_members_optional() {
        let out = definitions_file(&[users()], "\t");
        assert!(out.starts_with("// tslint:disable\nimport * as Sequelize from 'sequelize';\n"));
        assert!(out.contains("export interface usersAttribute {\n\tid: number;\n\temail?: string;\n}\n"));
        assert!(out.contains(
            "export interface usersInstance extends Sequelize.Instance<usersAttribute>, usersAttribute { }\n"
        ));
        assert!(out.contains(
            "export interface usersModel extends Sequelize.Model<usersInstance, usersAttribute> { }\n"
        ));
    }

    #[test]
    fn tables_file_lists_every_model() {
        let out = tables_file(&[users()], "  ");
        assert!(out.contains("export interface ITables {\n  users: def.usersModel;\n}\n"));
        assert!(out.contains("    users: seq.import(path.join(__dirname, './users')),\n"));
        assert!(out.ends_with("  };\n  return tables;\n};\n"));
    }
}
