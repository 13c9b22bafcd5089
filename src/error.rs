//! Error types for the fingerprint snapshot engine.

use std::path::PathBuf;
use thiserror::Error;

/// Snapshot engine errors
///
/// Per-file read failures are not represented here: they are recovered locally
/// as [`crate::snapshot::SkipRecord`]s and never abort a run.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Unsupported algorithm: {0} (expected one of: md5, sha256)")]
    UnsupportedAlgorithm(String),

    #[error(
        "Cannot read root directory {}: {}. Try re-running with elevated privileges.",
        path.display(),
        source
    )]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a directory: {}. Use `fingerprint digest` for a single file.", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Unable to read {}: {}", path.display(), source)]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot record not found: {}", .0.display())]
    RecordNotFound(PathBuf),

    #[error("Snapshot record {} is corrupt: {}", path.display(), reason)]
    RecordCorrupt { path: PathBuf, reason: String },

    #[error("Invalid ignore pattern '{pattern}': {reason}")]
    InvalidIgnorePattern { pattern: String, reason: String },

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// CLI and configuration surface errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Not enough history to compare: {0}")]
    InsufficientHistory(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
