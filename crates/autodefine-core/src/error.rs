use thiserror::Error;

/// Core error type shared across autodefine crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Catalog query failure or driver error.
    #[error("database error: {0}")]
    Db(String),
    /// The active dialect cannot perform the requested operation.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Options are inconsistent or cannot be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn db(err: impl std::fmt::Display) -> Self {
        Error::Db(err.to_string())
    }
}

/// Convenience alias for results returned by autodefine crates.
pub type Result<T> = std::result::Result<T, Error>;
