//! `defaultValue:` normalization.

use autodefine_core::{ColumnDescription, Dialect};

const DATE_KEYWORDS: &[&str] = &[
    "current_timestamp",
    "current_date",
    "current_time",
    "localtime",
    "localtimestamp",
];

/// Render the `defaultValue:` expression for a column, or `None` when the
/// attribute is omitted.
pub fn default_value_expression(
    column: &ColumnDescription,
    dialect: Dialect,
    is_serial_key: bool,
) -> Option<String> {
    let raw = column.default_value.as_deref()?;
    if dialect == Dialect::Mssql && raw.eq_ignore_ascii_case("(newid())") {
        return None;
    }
    if is_serial_key {
        return None;
    }

    let field_type = column.data_type.to_lowercase();
    if field_type == "bit(1)" {
        return Some(bit_flag(raw == "b'1'"));
    }
    if dialect == Dialect::Mssql && field_type == "bit" {
        return Some(bit_flag(raw == "((1))"));
    }

    if let Some(name) = raw.strip_suffix("()") {
        return Some(format!("sequelize.fn('{name}')"));
    }

    if field_type.starts_with("date") || field_type.starts_with("timestamp") {
        let lowered = raw.to_lowercase();
        if DATE_KEYWORDS.contains(&lowered.as_str()) {
            return Some(format!("sequelize.literal('{raw}')"));
        }
        return Some(quote(raw));
    }

    if dialect == Dialect::Mssql {
        let inner = unwrap_parens(raw);
        if field_type.contains("int") {
            if let Some(number) = leading_integer(&inner) {
                return Some(number.to_string());
            }
        } else if field_type.contains("float") {
            if let Ok(number) = inner.trim().parse::<f64>() {
                return Some(number.to_string());
            }
        }
    }

    Some(quote(raw))
}

fn bit_flag(set: bool) -> String {
    String::from(if set { "1" } else { "0" })
}

fn unwrap_parens(raw: &str) -> String {
    raw.replacen("((", "", 1).replacen("))", "", 1)
}

/// Parse an optional sign followed by digits, ignoring anything after.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let digits_end = text
        .char_indices()
        .find(|&(idx, ch)| !(ch.is_ascii_digit() || (idx == 0 && (ch == '-' || ch == '+'))))
        .map_or(text.len(), |(idx, _)| idx);
    text[..digits_end].parse().ok()
}

/// Single-quoted JavaScript string literal. Surrounding double quotes are
/// dropped; no `N` prefix is emitted for SQL Server.
pub fn quote(value: &str) -> String {
    js_string(value.trim_matches('"'))
}

pub(crate) fn js_string(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => literal.push_str("\\\\"),
            '\'' => literal.push_str("\\'"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\u{2028}' => literal.push_str("\\u2028"),
            '\u{2029}' => literal.push_str("\\u2029"),
            other => literal.push(other),
        }
    }
    literal.push('\'');
    literal
}
