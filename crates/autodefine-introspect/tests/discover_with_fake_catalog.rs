use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use autodefine_core::{CatalogRow, ColumnDescription, Dialect, Error, GeneratorOptions};
use autodefine_introspect::{Catalog, CatalogConfig, discover};
use serde_json::{Value, json};

/// Canned catalog: `query_rows` answers with the first response whose needle
/// occurs in the SQL text. A `None` response fails the query.
struct FakeCatalog {
    config: CatalogConfig,
    tables: Vec<String>,
    columns: BTreeMap<String, Vec<ColumnDescription>>,
    responses: Vec<(String, Option<Vec<CatalogRow>>)>,
    queries: Mutex<Vec<String>>,
}

impl FakeCatalog {
    fn new(dialect: Dialect, database: Option<&str>) -> Self {
        Self {
            config: CatalogConfig {
                dialect,
                database: database.map(str::to_string),
                schema: None,
            },
            tables: Vec::new(),
            columns: BTreeMap::new(),
            responses: Vec::new(),
            queries: Mutex::new(Vec::new()),
        }
    }

    fn table(mut self, name: &str, columns: Vec<ColumnDescription>) -> Self {
        self.tables.push(name.to_string());
        self.columns.insert(name.to_string(), columns);
        self
    }

    fn respond(mut self, needle: &str, rows: Vec<Value>) -> Self {
        let rows = rows
            .into_iter()
            .filter_map(|row| row.as_object().cloned())
            .collect();
        self.responses.push((needle.to_string(), Some(rows)));
        self
    }

    fn fail(mut self, needle: &str) -> Self {
        self.responses.push((needle.to_string(), None));
        self
    }

    fn issued(&self) -> Vec<String> {
        self.queries.lock().map(|queries| queries.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    fn config(&self) -> &CatalogConfig {
        &self.config
    }

    async fn list_tables(&self) -> autodefine_core::Result<Vec<String>> {
        Ok(self.tables.clone())
    }

    async fn describe_table(
        &self,
        table: &str,
        _schema: Option<&str>,
    ) -> autodefine_core::Result<Vec<ColumnDescription>> {
        self.columns
            .get(table)
            .cloned()
            .ok_or_else(|| Error::Db(format!("relation \"{table}\" does not exist")))
    }

    async fn query_rows(&self, sql: &str) -> autodefine_core::Result<Vec<CatalogRow>> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(sql.to_string());
        }
        match self.responses.iter().find(|(needle, _)| sql.contains(needle.as_str())) {
            Some((_, Some(rows))) => Ok(rows.clone()),
            Some((_, None)) => Err(Error::Db("connection reset".to_string())),
            None => Ok(Vec::new()),
        }
    }
}

fn column(name: &str, data_type: &str, allow_null: bool, primary_key: bool) -> ColumnDescription {
    ColumnDescription {
        allow_null,
        primary_key,
        ..ColumnDescription::new(name, data_type)
    }
}

fn users_and_roles() -> FakeCatalog {
    FakeCatalog::new(Dialect::Postgres, Some("app"))
        .table(
            "roles",
            vec![
                column("id", "INTEGER", false, true),
                column("name", "CHARACTER VARYING(64)", false, false),
            ],
        )
        .table(
            "users",
            vec![
                column("id", "INTEGER", false, true),
                column("role_id", "INTEGER", true, false),
                column("email", "CHARACTER VARYING(255)", false, false),
            ],
        )
        .respond(
            "relname = 'users'",
            vec![
                json!({"source_column": "id", "target_table": null, "target_column": null,
                       "contype": "p", "extra": "nextval('users_id_seq'::regclass)"}),
                json!({"source_column": "role_id", "target_table": "roles", "target_column": "id",
                       "contype": "f", "extra": null}),
                json!({"source_column": "email", "target_table": null, "target_column": null,
                       "contype": "u", "extra": null}),
            ],
        )
        .respond(
            "relname = 'roles'",
            vec![json!({"source_column": "id", "target_table": null, "target_column": null,
                        "contype": "p", "extra": "nextval('roles_id_seq'::regclass)"})],
        )
}

#[tokio::test]
async fn discovers_tables_and_keys_in_enumeration_order() -> Result<()> {
    let catalog = users_and_roles();
    let discovery = discover(&catalog, &GeneratorOptions::default()).await?;

    let names: Vec<&str> = discovery.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["roles", "users"]);

    let users = &discovery.tables[1];
    let columns: Vec<&str> = users.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(columns, ["id", "role_id", "email"]);

    let id = discovery.foreign_keys.get("users", "id").context("users.id key")?;
    assert!(id.is_primary_key && id.is_serial_key && !id.is_foreign_key);

    let role = discovery
        .foreign_keys
        .get("users", "role_id")
        .context("users.role_id key")?;
    assert!(role.is_foreign_key);
    let sources = role.foreign_sources.as_ref().context("foreign sources")?;
    assert_eq!(sources.target_table, "roles");
    assert_eq!(sources.target_column, "id");
    assert_eq!(sources.source_table, "users");
    assert_eq!(sources.source_schema.as_deref(), Some("app"));

    let email = discovery
        .foreign_keys
        .get("users", "email")
        .context("users.email key")?;
    assert!(email.is_unique && !email.is_foreign_key);

    assert_eq!(catalog.issued().len(), 2);
    assert!(catalog.issued().iter().all(|sql| sql.contains("FROM pg_constraint o")));
    Ok(())
}

#[tokio::test]
async fn adapters_without_optional_queries_skip_those_phases() -> Result<()> {
    let catalog = users_and_roles();
    let discovery = discover(&catalog, &GeneratorOptions::default()).await?;

    assert_eq!(discovery.tables.len(), 2);
    assert!(discovery.tables.iter().flat_map(|t| &t.columns).all(|c| !c.autoincrement));
    for sql in catalog.issued() {
        assert!(!sql.contains("information_schema.tables"));
        assert!(!sql.contains("USER_TAB_IDENTITY_COLS"));
        assert!(!sql.contains("all_tab_columns"));
    }
    Ok(())
}

#[tokio::test]
async fn key_queries_without_database_are_not_scoped_to_an_empty_name() -> Result<()> {
    let mssql = FakeCatalog::new(Dialect::Mssql, None)
        .table("users", vec![column("id", "INT", false, true)])
        .respond(
            "ccu.table_name = 'users'",
            vec![json!({"source_column": "id", "target_table": null, "target_column": null,
                        "constraint_type": "PRIMARY KEY", "is_identity": true})],
        );
    let discovery = discover(&mssql, &GeneratorOptions::default()).await?;

    let issued = mssql.issued();
    assert_eq!(issued.len(), 1);
    assert!(issued[0].ends_with("WHERE ccu.table_name = 'users'"));
    assert!(!issued[0].contains("''"));
    let id = discovery.foreign_keys.get("users", "id").context("users.id key")?;
    assert!(id.is_primary_key && id.is_serial_key);

    let mysql = FakeCatalog::new(Dialect::Mysql, None)
        .table("users", vec![column("id", "INT(11)", false, true)]);
    discover(&mysql, &GeneratorOptions::default()).await?;
    let issued = mysql.issued();
    assert_eq!(issued.len(), 1);
    assert!(issued[0].contains("K.TABLE_NAME = 'users' AND K.CONSTRAINT_SCHEMA = DATABASE();"));
    Ok(())
}

#[tokio::test]
async fn foreign_key_failures_are_swallowed() -> Result<()> {
    let catalog = FakeCatalog::new(Dialect::Postgres, Some("app"))
        .table("audit", vec![column("id", "INTEGER", false, true)])
        .fail("relname = 'audit'");

    let discovery = discover(&catalog, &GeneratorOptions::default()).await?;
    assert_eq!(discovery.tables.len(), 1);
    assert!(discovery.foreign_keys.table("audit").is_none());
    Ok(())
}

#[tokio::test]
async fn description_failures_abort() {
    let mut catalog = users_and_roles();
    catalog.tables.push("ghost".to_string());

    let outcome = discover(&catalog, &GeneratorOptions::default()).await;
    assert!(matches!(outcome, Err(Error::Db(message)) if message.contains("ghost")));
}

#[tokio::test]
async fn table_filters_limit_every_phase() -> Result<()> {
    let catalog = users_and_roles();
    let options = GeneratorOptions {
        tables: Some(vec!["users".to_string()]),
        ..GeneratorOptions::default()
    };

    let discovery = discover(&catalog, &options).await?;
    assert_eq!(discovery.tables.len(), 1);
    assert_eq!(discovery.tables[0].name, "users");
    assert!(discovery.foreign_keys.table("roles").is_none());
    assert!(catalog.issued().iter().all(|sql| !sql.contains("relname = 'roles'")));
    Ok(())
}

#[tokio::test]
async fn postgres_schema_lists_tables_through_catalog_query() -> Result<()> {
    let catalog = FakeCatalog::new(Dialect::Postgres, Some("app"))
        .table("orders", vec![column("id", "INTEGER", false, true)])
        .respond("table_schema = 'sales'", vec![json!({"table_name": "orders"})]);
    let options = GeneratorOptions {
        schema: Some("sales".to_string()),
        ..GeneratorOptions::default()
    };

    let discovery = discover(&catalog, &options).await?;
    assert_eq!(discovery.tables[0].name, "orders");
    assert!(
        catalog
            .issued()
            .iter()
            .any(|sql| sql.contains("spatial_ref_sys"))
    );
    Ok(())
}

#[tokio::test]
async fn oracle_discovery_describes_and_marks_identity_columns() -> Result<()> {
    let catalog = FakeCatalog::new(Dialect::Oracle, None)
        .respond("FROM all_tables", vec![json!({"TABLE_SCHEMA": "APP", "TABLE_NAME": "users"})])
        .respond(
            "USER_TAB_IDENTITY_COLS",
            vec![json!({"TABLE_NAME": "USERS", "COLUMN_NAME": "id"})],
        )
        .respond(
            "all_tab_columns",
            vec![
                json!({"COLUMN_NAME": "ID", "DATA_TYPE": "NUMBER", "DATA_PRECISION": 10,
                       "DATA_SCALE": 0, "NULLABLE": "N", "PRIMARY": "PRIMARY"}),
                json!({"COLUMN_NAME": "NAME", "DATA_TYPE": "VARCHAR2", "CHAR_LENGTH": 80,
                       "NULLABLE": "Y", "PRIMARY": ""}),
            ],
        );

    let discovery = discover(&catalog, &GeneratorOptions::default()).await?;
    assert_eq!(discovery.tables.len(), 1);

    let users = &discovery.tables[0];
    assert_eq!(users.name, "users");
    let id = users.column("id").context("id column")?;
    assert!(id.autoincrement);
    assert!(id.primary_key);
    let name = users.column("name").context("name column")?;
    assert!(!name.autoincrement);

    assert!(discovery.foreign_keys.is_empty());
    let issued = catalog.issued();
    assert!(issued.iter().any(|sql| sql.contains("LOWER(table_name) AS table_name")));
    assert!(issued.iter().any(|sql| sql.contains("TABLE_NAME = 'USERS'")));
    Ok(())
}
