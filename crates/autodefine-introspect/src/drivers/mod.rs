//! sqlx-backed catalogs for the engines with a bundled driver.

use autodefine_core::{Dialect, Error, Result};

use crate::catalog::Catalog;

mod mysql;
mod postgres;
mod rows;
mod sqlite;

pub use mysql::MysqlCatalog;
pub use postgres::PostgresCatalog;
pub use sqlite::SqliteCatalog;

/// Open a catalog for `url`, dispatching on its scheme.
///
/// SQL Server and Oracle have no bundled driver; callers supply their own
/// [`Catalog`] for those.
pub async fn connect(url: &str, schema: Option<String>) -> Result<Box<dyn Catalog>> {
    match Dialect::from_url(url) {
        Some(Dialect::Postgres) => Ok(Box::new(PostgresCatalog::connect(url, schema).await?)),
        Some(Dialect::Mysql) => Ok(Box::new(MysqlCatalog::connect(url, schema).await?)),
        Some(Dialect::Sqlite) => Ok(Box::new(SqliteCatalog::connect(url).await?)),
        Some(dialect) => Err(Error::Unsupported(format!(
            "no bundled driver for {dialect}"
        ))),
        None => Err(Error::Unsupported(
            "unrecognized connection string scheme".to_string(),
        )),
    }
}
