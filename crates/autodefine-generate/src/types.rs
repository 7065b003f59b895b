//! Catalog type string to `DataTypes.*` expression.
//!
//! Rules are tried in order against the lower-cased catalog type and the
//! first match wins. Oracle `NUMBER` columns are additionally matched on
//! their precision and scale.

use std::sync::OnceLock;

use regex::Regex;

use autodefine_core::{ColumnDescription, Dialect};

/// How a matched rule renders its expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Render {
    Fixed(&'static str),
    /// Append the first `(n)` found in the catalog type.
    WithLength(&'static str),
    /// `INTEGER(n)` plus `.UNSIGNED` / `.ZEROFILL` modifiers.
    Integer,
}

type NumberCheck = fn(Option<i64>, Option<i64>) -> bool;

struct TypeRule {
    exact: &'static [&'static str],
    pattern: Option<Regex>,
    oracle_number: Option<NumberCheck>,
    render: Render,
}

impl TypeRule {
    fn new(pattern: &str, render: Render) -> Self {
        Self {
            exact: &[],
            pattern: Regex::new(pattern).ok(),
            oracle_number: None,
            render,
        }
    }

    fn exact(values: &'static [&'static str], render: Render) -> Self {
        Self {
            exact: values,
            pattern: None,
            oracle_number: None,
            render,
        }
    }

    fn or_oracle_number(mut self, check: NumberCheck) -> Self {
        self.oracle_number = Some(check);
        self
    }

    fn matches(&self, lowered: &str, column: &ColumnDescription, dialect: Dialect) -> bool {
        if self.exact.contains(&lowered) {
            return true;
        }
        if self.pattern.as_ref().is_some_and(|re| re.is_match(lowered)) {
            return true;
        }
        dialect == Dialect::Oracle
            && lowered == "number"
            && self
                .oracle_number
                .is_some_and(|check| check(column.data_precision, column.data_scale))
    }
}

fn rules() -> &'static [TypeRule] {
    static RULES: OnceLock<Vec<TypeRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            TypeRule::exact(&["boolean", "bit(1)", "bit"], Render::Fixed("BOOLEAN"))
                .or_oracle_number(|precision, _| precision == Some(1)),
            TypeRule::new(r"^(smallint|mediumint|tinyint|int)", Render::Integer)
                .or_oracle_number(|_, scale| scale == Some(0)),
            // Oracle NUMBER(19, 0) is already claimed by the INTEGER rule.
            TypeRule::new(r"^bigint", Render::Fixed("BIGINT"))
                .or_oracle_number(|precision, scale| scale == Some(0) && precision == Some(19)),
            TypeRule::new(r"^varchar", Render::WithLength("STRING")),
            TypeRule::new(r"^string|varying|nvarchar", Render::Fixed("STRING")),
            TypeRule::new(r"^char", Render::WithLength("CHAR")),
            TypeRule::new(r"^real", Render::Fixed("REAL")),
            TypeRule::new(r"text|ntext$", Render::Fixed("TEXT")),
            TypeRule::new(r"^(date|timestamp)", Render::Fixed("DATE")),
            TypeRule::new(r"^(time)", Render::Fixed("TIME")),
            TypeRule::new(r"^(float|float4)", Render::Fixed("FLOAT")),
            TypeRule::new(r"^decimal", Render::Fixed("DECIMAL"))
                .or_oracle_number(|precision, scale| precision != Some(0) && scale != Some(0)),
            TypeRule::new(r"^(float8|double|numeric)", Render::Fixed("DOUBLE"))
                .or_oracle_number(|precision, scale| precision != Some(15) && scale != Some(5)),
            TypeRule::new(r"^uuid|uniqueidentifier", Render::Fixed("UUIDV4")),
            TypeRule::new(r"^jsonb", Render::Fixed("JSONB")),
            TypeRule::new(r"^json", Render::Fixed("JSON")),
            TypeRule::new(r"^geometry", Render::Fixed("GEOMETRY")),
        ]
    })
}

fn length_suffix(lowered: &str) -> &str {
    static LENGTH: OnceLock<Option<Regex>> = OnceLock::new();
    LENGTH
        .get_or_init(|| Regex::new(r"\(\d+\)").ok())
        .as_ref()
        .and_then(|re| re.find(lowered))
        .map_or("", |found| found.as_str())
}

/// Whether `column` is a postgres enum with known labels.
pub fn is_enum(column: &ColumnDescription) -> bool {
    column.data_type == "USER-DEFINED" && !column.special.is_empty()
}

/// `DataTypes.ENUM("a","b")` for the given labels.
pub fn enum_expression(labels: &[String]) -> String {
    let quoted: Vec<String> = labels.iter().map(|label| format!("\"{label}\"")).collect();
    format!("DataTypes.ENUM({})", quoted.join(","))
}

/// Render the `type:` expression for a column.
///
/// Unknown types fall back to the raw catalog type in double quotes.
pub fn data_type_expression(column: &ColumnDescription, dialect: Dialect) -> String {
    if is_enum(column) {
        return enum_expression(&column.special);
    }

    let lowered = column.data_type.to_lowercase();
    let Some(rule) = rules()
        .iter()
        .find(|rule| rule.matches(&lowered, column, dialect))
    else {
        return format!("\"{}\"", column.data_type);
    };

    match rule.render {
        Render::Fixed(name) => format!("DataTypes.{name}"),
        Render::WithLength(name) => format!("DataTypes.{name}{}", length_suffix(&lowered)),
        Render::Integer => {
            let mut expr = format!("DataTypes.INTEGER{}", length_suffix(&lowered));
            if lowered.contains("unsigned") {
                expr.push_str(".UNSIGNED");
            }
            if lowered.contains("zerofill") {
                expr.push_str(".ZEROFILL");
            }
            expr
        }
    }
}

/// TypeScript type for a rendered `type:` expression.
pub fn typescript_type(expression: &str) -> &'static str {
    let Some(name) = expression.strip_prefix("DataTypes.") else {
        return "any";
    };
    let base = name
        .split(|ch: char| ch == '(' || ch == '.')
        .next()
        .unwrap_or_default();
    match base {
        "INTEGER" | "BIGINT" | "FLOAT" | "DOUBLE" | "DECIMAL" | "REAL" => "number",
        "STRING" | "CHAR" | "TEXT" | "UUIDV4" | "ENUM" | "TIME" => "string",
        "DATE" => "Date",
        "BOOLEAN" => "boolean",
        "JSON" | "JSONB" | "GEOMETRY" => "object",
        _ => "any",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(data_type: &str) -> String {
        data_type_expression(&ColumnDescription::new("c", data_type), Dialect::Mysql)
    }

    fn oracle_number(precision: Option<i64>, scale: Option<i64>) -> String {
        let column = ColumnDescription {
            data_precision: precision,
            data_scale: scale,
            ..ColumnDescription::new("c", "NUMBER")
        };
        data_type_expression(&column, Dialect::Oracle)
    }

    #[test]
    fn integers_keep_length_and_modifiers() {
        assert_eq!(expr("INT(11)"), "DataTypes.INTEGER(11)");
        assert_eq!(expr("int(10) unsigned"), "DataTypes.INTEGER(10).UNSIGNED");
        assert_eq!(
            expr("TINYINT(3) UNSIGNED ZEROFILL"),
            "DataTypes.INTEGER(3).UNSIGNED.ZEROFILL"
        );
        assert_eq!(expr("INTEGER"), "DataTypes.INTEGER");
        assert_eq!(expr("BIGINT"), "DataTypes.BIGINT");
    }

    #[test]
    fn booleans_come_first() {
        assert_eq!(expr("BIT(1)"), "DataTypes.BOOLEAN");
        assert_eq!(expr("bit"), "DataTypes.BOOLEAN");
        assert_eq!(expr("BOOLEAN"), "DataTypes.BOOLEAN");
    }

    #[test]
    fn strings_and_chars() {
        assert_eq!(expr("VARCHAR(255)"), "DataTypes.STRING(255)");
        assert_eq!(expr("CHARACTER VARYING(64)"), "DataTypes.STRING");
        assert_eq!(expr("NVARCHAR"), "DataTypes.STRING");
        assert_eq!(expr("CHAR(2)"), "DataTypes.CHAR(2)");
        assert_eq!(expr("LONGTEXT"), "DataTypes.TEXT");
    }

    #[test]
    fn temporal_and_numeric() {
        assert_eq!(expr("TIMESTAMP WITH TIME ZONE"), "DataTypes.DATE");
        assert_eq!(expr("DATETIME"), "DataTypes.DATE");
        assert_eq!(expr("TIME WITHOUT TIME ZONE"), "DataTypes.TIME");
        assert_eq!(expr("FLOAT4"), "DataTypes.FLOAT");
        assert_eq!(expr("REAL"), "DataTypes.REAL");
        assert_eq!(expr("DECIMAL(10,2)"), "DataTypes.DECIMAL");
        assert_eq!(expr("NUMERIC"), "DataTypes.DOUBLE");
        assert_eq!(expr("DOUBLE PRECISION"), "DataTypes.DOUBLE");
    }

    #[test]
    fn json_uuid_geometry_and_fallback() {
        assert_eq!(expr("UUID"), "DataTypes.UUIDV4");
        assert_eq!(expr("UNIQUEIDENTIFIER"), "DataTypes.UUIDV4");
        assert_eq!(expr("JSONB"), "DataTypes.JSONB");
        assert_eq!(expr("JSON"), "DataTypes.JSON");
        assert_eq!(expr("GEOMETRY"), "DataTypes.GEOMETRY");
        assert_eq!(expr("INET"), "\"INET\"");
    }

    #[test]
    fn postgres_enums() {
        let column = ColumnDescription {
            special: vec!["happy".into(), "sad".into()],
            ..ColumnDescription::new("mood", "USER-DEFINED")
        };
        assert_eq!(
            data_type_expression(&column, Dialect::Postgres),
            "DataTypes.ENUM(\"happy\",\"sad\")"
        );
        assert_eq!(
            data_type_expression(&ColumnDescription::new("x", "USER-DEFINED"), Dialect::Postgres),
            "\"USER-DEFINED\""
        );
    }

    #[test]
    fn oracle_number_precision_and_scale() {
        assert_eq!(oracle_number(Some(1), Some(0)), "DataTypes.BOOLEAN");
        assert_eq!(oracle_number(Some(10), Some(0)), "DataTypes.INTEGER");
        assert_eq!(oracle_number(Some(19), Some(0)), "DataTypes.INTEGER");
        assert_eq!(oracle_number(Some(10), Some(2)), "DataTypes.DECIMAL");
        assert_eq!(oracle_number(Some(15), Some(5)), "DataTypes.DECIMAL");
        assert_eq!(oracle_number(Some(0), Some(2)), "DataTypes.DOUBLE");
        assert_eq!(oracle_number(Some(0), Some(5)), "\"NUMBER\"");
        assert_eq!(oracle_number(Some(15), Some(2)), "DataTypes.DECIMAL");
    }

    #[test]
    fn every_rule_pattern_compiles() {
        for rule in rules() {
            assert!(!rule.exact.is_empty() || rule.pattern.is_some());
        }
        assert_eq!(length_suffix("varchar(12)"), "(12)");
    }

    #[test]
    fn mapped_names_map_to_themselves() {
        for name in [
            "BOOLEAN", "INTEGER", "BIGINT", "STRING", "CHAR", "REAL", "TEXT", "DATE", "TIME",
            "FLOAT", "DECIMAL", "DOUBLE", "UUIDV4", "JSONB", "JSON", "GEOMETRY",
        ] {
            let mapped = expr(name);
            assert_eq!(mapped, format!("DataTypes.{name}"));
            let again = mapped.trim_start_matches("DataTypes.");
            assert_eq!(expr(again), mapped);
        }
    }

    #[test]
    fn number_outside_oracle_falls_back() {
        assert_eq!(expr("NUMBER"), "\"NUMBER\"");
    }

    #[test]
    fn typescript_types_follow_expressions() {
        assert_eq!(typescript_type("DataTypes.INTEGER(11).UNSIGNED"), "number");
        assert_eq!(typescript_type("DataTypes.STRING(255)"), "string");
        assert_eq!(typescript_type("DataTypes.ENUM(\"a\")"), "string");
        assert_eq!(typescript_type("DataTypes.DATE"), "Date");
        assert_eq!(typescript_type("DataTypes.BOOLEAN"), "boolean");
        assert_eq!(typescript_type("DataTypes.JSONB"), "object");
        assert_eq!(typescript_type("\"INET\""), "any");
    }
}
