//! Unified error types for the ETL pipeline.
//!
//! Only table-level failures surface here. Individual malformed records are
//! never errors: the scanners skip and count them (see `lake::source`).

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the ETL pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Filesystem failure while scanning sources or writing tables.
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required upstream table is missing or unreadable.
    #[error("dependency error: table '{table}' {message}")]
    Dependency {
        table: &'static str,
        message: String,
    },

    /// Arrow record batch construction failed.
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet encode/decode failed.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Unexpected internal failure (worker panic and the like).
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Dependency error: the fact builder's read of `songs` is the one
    /// hard cross-stage dependency in the pipeline.
    pub fn dependency(table: &'static str, message: impl Into<String>) -> Self {
        Self::Dependency {
            table,
            message: message.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
