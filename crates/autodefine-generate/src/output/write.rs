use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, warn};

use autodefine_core::GeneratorOptions;

use crate::errors::GenerationError;
use crate::model::RenderedModel;
use crate::typescript::{definitions_file, tables_file};

/// Write one file per model, plus the TypeScript companions when enabled.
///
/// Files are written in model order; the first failure is returned and files
/// already written stay in place.
pub fn write_models(
    models: &[RenderedModel],
    options: &GeneratorOptions,
) -> Result<Vec<PathBuf>, GenerationError> {
    let directory = options.directory.as_path();
    create_dir_all(directory)?;

    let extension = if options.typescript { "ts" } else { "js" };
    let mut written = Vec::with_capacity(models.len() + 2);

    for model in models {
        let path = directory.join(format!("{}.{extension}", model.file_stem));
        write_file(&path, &model.source)?;
        info!(event = "file_written", table = %model.table, path = %path.display());
        written.push(path);
    }

    if options.typescript {
        let sp = options.indent_unit();
        for (name, content) in [
            ("db.d.ts", definitions_file(models, &sp)),
            ("db.tables.ts", tables_file(models, &sp)),
        ] {
            let path = directory.join(name);
            write_file(&path, &content)?;
            info!(event = "file_written", path = %path.display());
            written.push(path);
        }
    }

    Ok(written)
}

fn write_file(path: &Path, content: &str) -> Result<(), GenerationError> {
    write_bytes_atomic(path, content.as_bytes()).map_err(|source| GenerationError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write through a sibling `.tmp` file and rename it into place. On failure
/// the `.tmp` file is removed.
pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let tmp_path = path.with_file_name(format!("{}.tmp", file_name.to_string_lossy()));

    let written = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)
        .and_then(|mut file| {
            file.write_all(data)?;
            file.sync_all()
        })
        .and_then(|()| std::fs::rename(&tmp_path, path));

    if written.is_err() {
        let _ = std::fs::remove_file(&tmp_path);
    }
    written
}

/// Run the configured post-process command with the output directory as its
/// last argument. A non-zero exit is logged and reported as `Ok(false)`.
pub fn run_post_process(command: &[String], directory: &Path) -> Result<bool, GenerationError> {
    let Some((program, args)) = command.split_first() else {
        return Err(GenerationError::EmptyCommand);
    };

    let status = Command::new(program).args(args).arg(directory).status()?;
    if status.success() {
        info!(event = "post_process_finished", program = %program);
        Ok(true)
    } else {
        warn!(event = "post_process_failed", program = %program, status = %status);
        Ok(false)
    }
}
