//! Engine facade
//!
//! Ties the builder, store and diff together into the operations the CLI
//! exposes: snapshot a tree, compare its two latest records, digest one file
//! and list history.

use crate::config::SnapshotConfig;
use crate::diff::{self, DiffResult};
use crate::error::SnapshotError;
use crate::ignore::{ignore_file_for, IgnoreMatcher};
use crate::progress::{NoopProgress, ProgressReporter};
use crate::snapshot::{BuildOutcome, SkipRecord, SnapshotBuilder};
use crate::store::{RecordId, SavedRecord, SnapshotStore};
use crate::tree::hasher::{self, Algorithm, DEFAULT_CHUNK_SIZE};
use crate::tree::path;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Per-run snapshot settings
#[derive(Debug, Clone)]
pub struct SnapshotOptions {
    pub algorithm: Algorithm,
    pub parallelism: usize,
    pub chunk_size: usize,
    /// Overrides `<root>/.fingerprintignore`
    pub ignore_file: Option<PathBuf>,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            parallelism: 1,
            chunk_size: DEFAULT_CHUNK_SIZE,
            ignore_file: None,
        }
    }
}

impl From<&SnapshotConfig> for SnapshotOptions {
    fn from(config: &SnapshotConfig) -> Self {
        Self {
            algorithm: config.algorithm,
            parallelism: config.parallelism,
            chunk_size: config.chunk_size,
            ignore_file: config.ignore_file.clone(),
        }
    }
}

/// What a completed snapshot run produced
#[derive(Debug, Clone)]
pub struct SnapshotReport {
    pub record: SavedRecord,
    pub algorithm: Algorithm,
    pub file_count: usize,
    pub skipped: Vec<SkipRecord>,
}

/// Outcome of comparing the two latest records of a root
#[derive(Debug, Clone)]
pub enum Comparison {
    /// Fewer than two records exist for the root
    NotEnoughHistory { found: usize },
    /// The two records were digested with different algorithms, so every
    /// digest would differ
    AlgorithmMismatch {
        older: RecordId,
        newer: RecordId,
        older_algorithm: Algorithm,
        newer_algorithm: Algorithm,
    },
    Compared {
        older: RecordId,
        newer: RecordId,
        diff: DiffResult,
    },
}

pub struct FingerprintEngine {
    store: SnapshotStore,
    options: SnapshotOptions,
    progress: Arc<dyn ProgressReporter>,
}

impl FingerprintEngine {
    pub fn new(store: SnapshotStore, options: SnapshotOptions) -> Self {
        Self {
            store,
            options,
            progress: Arc::new(NoopProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn options(&self) -> &SnapshotOptions {
        &self.options
    }

    /// Build a snapshot of `root` without persisting it
    pub fn build(&self, root: &Path) -> Result<BuildOutcome, SnapshotError> {
        let root = path::normalize_root(root);
        let ignore_path = ignore_file_for(&root, self.options.ignore_file.as_deref());
        let ignore = IgnoreMatcher::load(Some(&ignore_path))?;

        let mut builder = SnapshotBuilder::new(&root);
        let records_dir = path::normalize_root(self.store.dir());
        if records_dir.starts_with(&root) && records_dir != root {
            debug!(records = %records_dir.display(), "Records directory lies under the root; skipping it");
            builder = builder.with_excluded_dir(records_dir);
        }

        builder
            .with_algorithm(self.options.algorithm)
            .with_ignore(ignore)
            .with_progress(self.progress.clone())
            .with_parallelism(self.options.parallelism)
            .with_chunk_size(self.options.chunk_size)
            .build()
    }

    /// Build a snapshot of `root` and persist it as a new record
    #[instrument(skip(self), fields(root = %root.display()))]
    pub fn snapshot(&self, root: &Path) -> Result<SnapshotReport, SnapshotError> {
        let outcome = self.build(root)?;
        let record = self.store.save(&outcome.snapshot)?;

        Ok(SnapshotReport {
            record,
            algorithm: self.options.algorithm,
            file_count: outcome.snapshot.len(),
            skipped: outcome.skipped,
        })
    }

    /// Compare the two most recent records of `root`
    #[instrument(skip(self), fields(root = %root.display()))]
    pub fn compare(&self, root: &Path) -> Result<Comparison, SnapshotError> {
        let root_name = path::root_base_name(&path::normalize_root(root));
        let latest = self.store.find_latest(&root_name, 2)?;

        let [newer, older] = match <[RecordId; 2]>::try_from(latest) {
            Ok(pair) => pair,
            Err(found) => {
                info!(root = %root_name, found = found.len(), "Not enough history to compare");
                return Ok(Comparison::NotEnoughHistory { found: found.len() });
            }
        };

        let new_snapshot = self.store.load(&newer)?;
        let old_snapshot = self.store.load(&older)?;

        if let (Some(older_algorithm), Some(newer_algorithm)) =
            (old_snapshot.algorithm(), new_snapshot.algorithm())
        {
            if older_algorithm != newer_algorithm {
                warn!(
                    older = %older,
                    newer = %newer,
                    %older_algorithm,
                    %newer_algorithm,
                    "Records use different digest algorithms"
                );
                return Ok(Comparison::AlgorithmMismatch {
                    older,
                    newer,
                    older_algorithm,
                    newer_algorithm,
                });
            }
        }

        let diff = diff::diff(&new_snapshot, &old_snapshot);

        info!(
            older = %older,
            newer = %newer,
            added = diff.added.len(),
            removed = diff.removed.len(),
            modified = diff.modified.len(),
            "Comparison completed"
        );
        Ok(Comparison::Compared { older, newer, diff })
    }

    /// Digest a single regular file
    pub fn digest_file(&self, file: &Path, algorithm: Algorithm) -> Result<String, SnapshotError> {
        let metadata = fs::metadata(file).map_err(|source| SnapshotError::FileUnreadable {
            path: file.to_path_buf(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(SnapshotError::NotAFile(file.to_path_buf()));
        }

        hasher::digest_file_chunked(file, algorithm, self.options.chunk_size).map_err(|source| {
            SnapshotError::FileUnreadable {
                path: file.to_path_buf(),
                source,
            }
        })
    }

    /// Every record of `root`, newest first
    pub fn history(&self, root: &Path) -> Result<Vec<RecordId>, SnapshotError> {
        let root_name = path::root_base_name(&path::normalize_root(root));
        self.store.list(&root_name)
    }
}
