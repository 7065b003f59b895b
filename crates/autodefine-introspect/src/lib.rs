//! Catalog introspection: per-dialect key queries, key classification and
//! table description.

pub mod build;
pub mod catalog;
pub mod dialects;
pub mod drivers;
pub mod keys;

pub use build::{Discovery, discover, identity_columns};
pub use catalog::{Catalog, CatalogConfig};
pub use dialects::{CatalogDialect, KeyClassifier, RowPredicate, adapter_for};
pub use drivers::{MysqlCatalog, PostgresCatalog, SqliteCatalog, connect};
pub use keys::classify_row;
