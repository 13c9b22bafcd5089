//! Configuration System
//!
//! Layered configuration for snapshot defaults, record storage and logging.
//! Sources merge in order: built-in defaults, the global config file, the
//! workspace `fingerprint.toml`, then `FINGERPRINT__SECTION__KEY` environment
//! variables. CLI flags are applied on top by the caller.

use crate::logging::LoggingConfig;
use crate::tree::hasher::{Algorithm, DEFAULT_CHUNK_SIZE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FingerprintConfig {
    /// Snapshot defaults
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// Record storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for building snapshots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Digest algorithm (md5 or sha256)
    #[serde(default)]
    pub algorithm: Algorithm,

    /// Digest workers; 1 = sequential, 0 = one per core
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Read buffer size in bytes
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Ignore file to use instead of `<root>/.fingerprintignore`
    #[serde(default)]
    pub ignore_file: Option<PathBuf>,
}

fn default_parallelism() -> usize {
    1
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            parallelism: default_parallelism(),
            chunk_size: default_chunk_size(),
            ignore_file: None,
        }
    }
}

/// Where snapshot records are kept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Records directory; relative paths resolve against the working directory
    #[serde(default = "default_records_dir")]
    pub records_dir: PathBuf,
}

fn default_records_dir() -> PathBuf {
    PathBuf::from("hashes")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            records_dir: default_records_dir(),
        }
    }
}

impl StorageConfig {
    /// Resolve the records directory against a base directory
    pub fn resolve_records_dir(&self, base: &Path) -> PathBuf {
        if self.records_dir.is_absolute() {
            self.records_dir.clone()
        } else {
            base.join(&self.records_dir)
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Snapshot(String),
    Storage(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Snapshot(msg) => write!(f, "Snapshot: {}", msg),
            ValidationError::Storage(msg) => write!(f, "Storage: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl FingerprintConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.snapshot.chunk_size == 0 {
            errors.push(ValidationError::Snapshot(
                "chunk_size must be at least 1 byte".to_string(),
            ));
        }
        if self.storage.records_dir.as_os_str().is_empty() {
            errors.push(ValidationError::Storage(
                "records_dir cannot be empty".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
