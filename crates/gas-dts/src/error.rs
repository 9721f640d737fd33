//! Error types for loading, configuration and writing.

use std::path::PathBuf;

use thiserror::Error;

/// The documentation database could not be read or parsed.
///
/// These are the only fatal errors of a run: nothing is written once one of
/// them is raised.
#[derive(Debug, Error)]
pub enum LoadError {
    /// I/O error reading the input stream or file.
    #[error("failed to read documentation database: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not a well-formed documentation database.
    #[error("malformed documentation database: {0}")]
    Json(#[from] serde_json::Error),
}

/// The generator configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to read header template {path}: {source}")]
    HeaderTemplate {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A generated document could not be written.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
