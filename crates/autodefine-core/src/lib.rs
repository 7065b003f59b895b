//! Core contracts and helpers for autodefine.
//!
//! This crate defines the catalog metadata types, generator options, and
//! small utilities shared by the introspection adapters, the model generator
//! and the CLI.

pub mod catalog;
pub mod dialect;
pub mod error;
pub mod naming;
pub mod options;
pub mod redaction;

pub use catalog::{
    CatalogRow, ColumnDescription, ForeignKeyIndex, ForeignSources, KeyRecord, TableDescription,
    TableMetadata,
};
pub use dialect::Dialect;
pub use error::{Error, Result};
pub use naming::camel_case;
pub use options::{AdditionalOptions, GeneratorOptions, TimestampField};
pub use redaction::{RedactedConnection, redact_connection_string};
