//! Merge rules: defaults, override order, conflict handling.

use crate::tree::hasher::{Algorithm, DEFAULT_CHUNK_SIZE};
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("snapshot.algorithm", Algorithm::default().as_str())?
        .set_default("snapshot.parallelism", 1_i64)?
        .set_default("snapshot.chunk_size", DEFAULT_CHUNK_SIZE as i64)?
        .set_default("storage.records_dir", "hashes")
}
