//! Config loading entry point. Composes sources in precedence order and
//! deserializes the result.

use super::merge::merge_policy;
use super::sources::{global_file, workspace_file};
use super::FingerprintConfig;
use config::{Config, ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`FingerprintConfig`] from the layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace directory.
    ///
    /// Precedence, lowest first: defaults, global config file, workspace
    /// `fingerprint.toml`, `FINGERPRINT__SECTION__KEY` environment variables.
    pub fn load(workspace_root: &Path) -> Result<FingerprintConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = builder.add_source(environment());

        let config: FingerprintConfig = builder.build()?.try_deserialize()?;
        debug!(
            algorithm = %config.snapshot.algorithm,
            records_dir = %config.storage.records_dir.display(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load configuration from one explicit file, still honoring defaults and
    /// environment overrides.
    pub fn load_from_file(path: &Path) -> Result<FingerprintConfig, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let config = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true))
            .add_source(environment())
            .build()?;
        config.try_deserialize()
    }

    /// Location of the user-level config file
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    /// Defaults only, ignoring every file and the environment
    pub fn defaults() -> Result<FingerprintConfig, ConfigError> {
        let config: Config = merge_policy::builder_with_defaults()?.build()?;
        config.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("FINGERPRINT")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
