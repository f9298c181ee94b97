//! Error types for loading and typed lookups

use std::io;
use std::path::PathBuf;

/// Errors surfaced by [`crate::Container`].
///
/// Missing keys are never an error; lookups return `None` instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported config format '.{extension}' for file {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Working directory unavailable: {0}")]
    WorkingDirectory(#[source] io::Error),

    #[error("Invalid options: {0}")]
    Options(String),

    #[error("Value at '{key}' has unexpected shape: {source}")]
    Deserialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
