use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use autodefine_core::{GeneratorOptions, RedactedConnection};
use autodefine_generate::write_bytes_atomic;

use crate::CliError;

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub engine: String,
    pub connection: RedactedConnection,
}

/// JSON summary of a finished generation run.
#[derive(Debug, Serialize)]
pub struct RunManifest<'a> {
    pub run_id: &'a str,
    pub started_at: String,
    pub engine: &'a str,
    pub connection: &'a RedactedConnection,
    pub options: &'a GeneratorOptions,
    pub tables: Vec<&'a str>,
    pub files: &'a [PathBuf],
    pub duration_ms: u128,
}

impl<'a> RunManifest<'a> {
    pub fn new(
        ctx: &'a RunContext,
        options: &'a GeneratorOptions,
        tables: Vec<&'a str>,
        files: &'a [PathBuf],
        duration_ms: u128,
    ) -> Self {
        Self {
            run_id: &ctx.run_id,
            started_at: ctx.started_at.to_rfc3339(),
            engine: &ctx.engine,
            connection: &ctx.connection,
            options,
            tables,
            files,
            duration_ms,
        }
    }
}

pub fn write_manifest(path: &Path, manifest: &RunManifest<'_>) -> Result<(), CliError> {
    let encoded = serde_json::to_vec_pretty(manifest)?;
    write_bytes_atomic(path, &encoded)?;
    Ok(())
}
