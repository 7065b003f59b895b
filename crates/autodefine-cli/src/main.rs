mod logging;
mod manifest;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use uuid::Uuid;

use autodefine_core::{Dialect, Error as CoreError, GeneratorOptions, redact_connection_string};
use autodefine_generate::{GenerationError, ModelGenerator, run_post_process, write_models};
use autodefine_introspect::{connect, discover};
use logging::init_logging;
use manifest::{RunContext, RunManifest, write_manifest};

#[derive(Debug, Error)]
enum CliError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("unsupported engine: {0}")]
    UnsupportedEngine(String),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "autodefine", version, about = "Sequelize model generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one model file per table.
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Database connection string.
    #[arg(value_name = "CONNECTION_STRING")]
    conn: String,
    /// TOML file with generator options; flags override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Output directory for model files.
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
    /// Schema to read tables from.
    #[arg(long)]
    schema: Option<String>,
    /// Only generate these tables.
    #[arg(long = "table", value_name = "TABLE")]
    tables: Vec<String>,
    /// Skip these tables.
    #[arg(long = "skip-table", value_name = "TABLE")]
    skip_tables: Vec<String>,
    /// Indentation units per nesting level.
    #[arg(long)]
    indentation: Option<usize>,
    /// Indent with spaces instead of tabs.
    #[arg(long, default_value_t = false)]
    spaces: bool,
    /// Camel-case attribute names.
    #[arg(long, default_value_t = false)]
    camel_case: bool,
    /// Camel-case file names.
    #[arg(long, default_value_t = false)]
    camel_case_file_names: bool,
    /// Emit TypeScript models and declaration files.
    #[arg(long, default_value_t = false)]
    typescript: bool,
    /// Maximum in-flight catalog queries.
    #[arg(long)]
    concurrency: Option<usize>,
    /// Write a JSON run manifest to this path.
    #[arg(long, value_name = "FILE")]
    manifest: Option<PathBuf>,
    /// Log JSON lines instead of human-readable output.
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args).await,
    }
}

async fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    init_logging(args.log_json)?;

    let engine = detect_engine(&args.conn)?;
    let options = resolve_options(&args)?;

    let ctx = RunContext {
        run_id: Uuid::new_v4().to_string(),
        started_at: chrono::Utc::now(),
        engine: engine.to_string(),
        connection: redact_connection_string(&args.conn),
    };

    tracing::info!(
        event = "run_started",
        run_id = %ctx.run_id,
        engine = %engine,
        connection = %ctx.connection.redacted
    );

    let timer = Instant::now();

    let catalog = connect(&args.conn, options.schema.clone()).await?;
    let discovery = discover(catalog.as_ref(), &options).await?;

    let generator = ModelGenerator::new(&options, engine);
    let models = generator.render_all(&discovery.tables, &discovery.foreign_keys);
    let files = write_models(&models, &options)?;

    if let Some(command) = &options.post_process {
        run_post_process(command, &options.directory)?;
    }

    let duration_ms = timer.elapsed().as_millis();

    if let Some(path) = &args.manifest {
        let tables = discovery
            .tables
            .iter()
            .map(|table| table.name.as_str())
            .collect();
        let manifest = RunManifest::new(&ctx, &options, tables, &files, duration_ms);
        write_manifest(path, &manifest)?;
        tracing::info!(event = "manifest_written", path = %path.display());
    }

    tracing::info!(
        event = "run_finished",
        status = "success",
        tables = discovery.tables.len(),
        files = files.len(),
        duration_ms = duration_ms
    );

    Ok(())
}

/// Engines with a bundled driver, keyed on the URL scheme.
fn detect_engine(conn: &str) -> Result<Dialect, CliError> {
    match Dialect::from_url(conn) {
        Some(dialect @ (Dialect::Postgres | Dialect::Mysql | Dialect::Sqlite)) => Ok(dialect),
        _ => {
            let scheme = redact_connection_string(conn)
                .engine
                .unwrap_or_else(|| "<none>".to_string());
            Err(CliError::UnsupportedEngine(scheme))
        }
    }
}

/// Options from `--config` (or defaults), overridden by flags.
fn resolve_options(args: &GenerateArgs) -> Result<GeneratorOptions, CliError> {
    let mut options = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            GeneratorOptions::from_toml(&content)?
        }
        None => GeneratorOptions::default(),
    };

    if let Some(out) = &args.out {
        options.directory = out.clone();
    }
    if let Some(schema) = &args.schema {
        options.schema = Some(schema.clone());
    }
    if !args.tables.is_empty() {
        options.tables = Some(args.tables.clone());
    }
    if !args.skip_tables.is_empty() {
        options.skip_tables = Some(args.skip_tables.clone());
    }
    if let Some(indentation) = args.indentation {
        options.indentation = indentation;
    }
    if let Some(concurrency) = args.concurrency {
        options.concurrency = concurrency;
    }
    options.spaces |= args.spaces;
    options.camel_case |= args.camel_case;
    options.camel_case_for_file_name |= args.camel_case_file_names;
    options.typescript |= args.typescript;

    options
        .validate()
        .map_err(|err| CliError::InvalidConfig(err.to_string()))?;
    Ok(options)
}
