//! CLI route: single route table and run context. Dispatches to the engine and presentation.

use crate::config::{ConfigLoader, FingerprintConfig};
use crate::engine::{Comparison, FingerprintEngine, SnapshotOptions};
use crate::error::{ApiError, SnapshotError};
use crate::progress::LogProgress;
use crate::store::SnapshotStore;
use crate::tree::hasher::Algorithm;
use crate::tree::path;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span};

use crate::cli::command_name;
use crate::cli::output::is_history_error;
use crate::cli::parse::{Commands, OutputFormat};
use crate::cli::presentation::{
    format_algorithm_mismatch_json, format_algorithm_mismatch_text, format_comparison_json,
    format_comparison_text, format_digest_line, format_history_json, format_history_text,
    format_not_enough_history_json, format_snapshot_report, NOT_ENOUGH_HISTORY,
};

/// Runtime context for CLI execution: resolved configuration and record store.
/// Built from the working directory and optional config path using ConfigLoader only.
pub struct RunContext {
    config: FingerprintConfig,
    store: SnapshotStore,
    color: bool,
}

impl RunContext {
    /// Create run context from an optional config path and records-dir override.
    pub fn new(config_path: Option<PathBuf>, store_override: Option<PathBuf>) -> Result<Self, ApiError> {
        let workspace_root = std::env::current_dir()
            .map_err(|e| ApiError::ConfigError(format!("Cannot determine working directory: {}", e)))?;

        let config = match config_path {
            Some(ref cfg_path) => ConfigLoader::load_from_file(cfg_path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Self::with_config(config, &workspace_root, store_override)
    }

    /// Create run context from an already loaded configuration.
    pub fn with_config(
        config: FingerprintConfig,
        workspace_root: &Path,
        store_override: Option<PathBuf>,
    ) -> Result<Self, ApiError> {
        if let Err(errors) = config.validate() {
            let joined: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            return Err(ApiError::ConfigError(joined.join("; ")));
        }

        let records_dir = match store_override {
            Some(dir) => dir,
            None => config.storage.resolve_records_dir(workspace_root),
        };
        debug!(records_dir = %records_dir.display(), "Using records directory");

        let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();

        Ok(Self {
            config,
            store: SnapshotStore::new(records_dir),
            color,
        })
    }

    /// Force colored text output on or off
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn config(&self) -> &FingerprintConfig {
        &self.config
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let name = command_name(command);
        let span = info_span!("command", name);
        let _enter = span.enter();

        let started = Instant::now();
        let result = self.execute_inner(command);
        info!(
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis(),
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Snapshot {
                path,
                drive,
                algo,
                ignore_file,
                jobs,
            } => {
                let root = match (path, drive) {
                    (_, true) => filesystem_root()?,
                    (Some(path), false) => path.clone(),
                    (None, false) => {
                        return Err(ApiError::ConfigError(
                            "A directory path or --drive is required".to_string(),
                        ))
                    }
                };
                let mut options = SnapshotOptions::from(&self.config.snapshot);
                if let Some(algo) = algo {
                    options.algorithm = parse_algorithm(algo)?;
                }
                if let Some(ignore_file) = ignore_file {
                    options.ignore_file = Some(ignore_file.clone());
                }
                if let Some(jobs) = jobs {
                    options.parallelism = *jobs;
                }

                let engine = self.engine(options).with_progress(Arc::new(LogProgress::default()));
                let report = engine.snapshot(&root)?;
                Ok(format_snapshot_report(&report))
            }
            Commands::Digest { file, algo } => {
                let algorithm = match algo {
                    Some(algo) => parse_algorithm(algo)?,
                    None => self.config.snapshot.algorithm,
                };
                let engine = self.engine(SnapshotOptions::from(&self.config.snapshot));
                let digest = engine.digest_file(file, algorithm)?;
                Ok(format_digest_line(algorithm, file, &digest))
            }
            Commands::Compare { path, format } => {
                let engine = self.engine(SnapshotOptions::from(&self.config.snapshot));
                let comparison = engine.compare(path).map_err(|e| {
                    if is_history_error(&e) {
                        ApiError::InsufficientHistory(e.to_string())
                    } else {
                        ApiError::Snapshot(e)
                    }
                })?;

                match (comparison, *format) {
                    (Comparison::NotEnoughHistory { found }, OutputFormat::Json) => {
                        format_not_enough_history_json(found)
                    }
                    (Comparison::NotEnoughHistory { .. }, OutputFormat::Text) => {
                        Ok(NOT_ENOUGH_HISTORY.to_string())
                    }
                    (
                        Comparison::AlgorithmMismatch {
                            older,
                            newer,
                            older_algorithm,
                            newer_algorithm,
                        },
                        OutputFormat::Json,
                    ) => format_algorithm_mismatch_json(&older, &newer, older_algorithm, newer_algorithm),
                    (
                        Comparison::AlgorithmMismatch {
                            older,
                            newer,
                            older_algorithm,
                            newer_algorithm,
                        },
                        OutputFormat::Text,
                    ) => Ok(format_algorithm_mismatch_text(
                        &older,
                        &newer,
                        older_algorithm,
                        newer_algorithm,
                    )),
                    (Comparison::Compared { older, newer, diff }, OutputFormat::Json) => {
                        format_comparison_json(&older, &newer, &diff)
                    }
                    (Comparison::Compared { older, newer, diff }, OutputFormat::Text) => {
                        Ok(format_comparison_text(&older, &newer, &diff, self.color))
                    }
                }
            }
            Commands::History {
                path,
                limit,
                format,
            } => {
                let engine = self.engine(SnapshotOptions::from(&self.config.snapshot));
                let mut records = engine.history(path)?;
                if let Some(limit) = limit {
                    records.truncate(*limit);
                }

                match *format {
                    OutputFormat::Json => format_history_json(&records, &self.store),
                    OutputFormat::Text => {
                        let root_name = path::root_base_name(&path::normalize_root(path));
                        Ok(format_history_text(&root_name, &records, &self.store))
                    }
                }
            }
        }
    }

    fn engine(&self, options: SnapshotOptions) -> FingerprintEngine {
        FingerprintEngine::new(self.store.clone(), options)
    }
}

fn parse_algorithm(name: &str) -> Result<Algorithm, ApiError> {
    name.parse::<Algorithm>().map_err(ApiError::from)
}

/// Root of the filesystem holding the working directory (`/`, or `C:\` on Windows)
fn filesystem_root() -> Result<PathBuf, ApiError> {
    let cwd = std::env::current_dir().map_err(|e| ApiError::Snapshot(SnapshotError::IoError(e)))?;
    Ok(cwd
        .ancestors()
        .last()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(std::path::MAIN_SEPARATOR_STR)))
}
