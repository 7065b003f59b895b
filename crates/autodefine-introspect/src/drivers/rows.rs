//! Decode driver rows into untyped catalog rows.

use serde_json::Value;
use sqlx::mysql::MySqlRow;
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, ValueRef};

use autodefine_core::CatalogRow;

/// Try each Rust type in order until one decodes; `NULL` cells become
/// `Value::Null` without trying.
macro_rules! decode_cell {
    ($row:expr, $index:expr; $($ty:ty => $convert:expr),+ $(,)?) => {{
        let index = $index;
        let is_null = $row
            .try_get_raw(index)
            .map(|raw| raw.is_null())
            .unwrap_or(true);
        let mut decoded = Value::Null;
        if !is_null {
            $(
                if decoded.is_null() {
                    if let Ok(value) = $row.try_get::<$ty, _>(index) {
                        decoded = ($convert)(value);
                    }
                }
            )+
        }
        decoded
    }};
}

fn lossy(bytes: Vec<u8>) -> Value {
    Value::String(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn pg_row(row: &PgRow) -> CatalogRow {
    row.columns()
        .iter()
        .map(|column| {
            let value = decode_cell!(row, column.ordinal();
                String => Value::String,
                i64 => Value::from,
                i32 => Value::from,
                i16 => Value::from,
                i8 => |code: i8| Value::String(char::from(code as u8).to_string()),
                f64 => Value::from,
                f32 => Value::from,
                bool => Value::Bool,
                Vec<String> => Value::from,
                Vec<u8> => lossy,
            );
            (column.name().to_string(), value)
        })
        .collect()
}

pub fn mysql_row(row: &MySqlRow) -> CatalogRow {
    row.columns()
        .iter()
        .map(|column| {
            let value = decode_cell!(row, column.ordinal();
                String => Value::String,
                i64 => Value::from,
                u64 => Value::from,
                i32 => Value::from,
                u32 => Value::from,
                f64 => Value::from,
                bool => Value::Bool,
                Vec<u8> => lossy,
            );
            (column.name().to_string(), value)
        })
        .collect()
}

pub fn sqlite_row(row: &SqliteRow) -> CatalogRow {
    row.columns()
        .iter()
        .map(|column| {
            let value = decode_cell!(row, column.ordinal();
                String => Value::String,
                i64 => Value::from,
                f64 => Value::from,
                bool => Value::Bool,
                Vec<u8> => lossy,
            );
            (column.name().to_string(), value)
        })
        .collect()
}
