use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted while rendering or writing model files.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("post-process command is empty")]
    EmptyCommand,
}
