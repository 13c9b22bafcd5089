//! Snapshot builder: walk, digest, isolate per-file failures

use crate::error::SnapshotError;
use crate::ignore::IgnoreMatcher;
use crate::progress::{FileOutcome, NoopProgress, ProgressReporter, ProgressUpdate};
use crate::snapshot::{SkipRecord, Snapshot};
use crate::tree::hasher::{self, Algorithm, DEFAULT_CHUNK_SIZE};
use crate::tree::path;
use crate::tree::walker::{WalkItem, Walker};
use chrono::Local;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Result of a build: the snapshot plus everything that could not be read
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub snapshot: Snapshot,
    /// Sorted by path
    pub skipped: Vec<SkipRecord>,
}

impl BuildOutcome {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

const COLLISION_REASON: &str = "another file maps to the same relative path";

/// Builds a [`Snapshot`] of a directory tree
///
/// An unreadable file never aborts the build; it is recorded as a
/// [`SkipRecord`] and the walk continues. Only problems with the root itself
/// are fatal. Files whose names normalize to the same relative path are all
/// skipped, so the result never depends on which one was digested last.
pub struct SnapshotBuilder {
    root: PathBuf,
    algorithm: Algorithm,
    ignore: IgnoreMatcher,
    progress: Arc<dyn ProgressReporter>,
    parallelism: usize,
    chunk_size: usize,
    excluded: Option<PathBuf>,
}

#[derive(Default)]
struct Digests {
    entries: BTreeMap<String, String>,
    /// Relative path -> number of files that produced it
    collisions: BTreeMap<String, usize>,
}

#[derive(Default)]
struct BuildState {
    digests: Mutex<Digests>,
    skipped: Mutex<Vec<SkipRecord>>,
    processed: AtomicU64,
    skipped_count: AtomicU64,
}

impl SnapshotBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            algorithm: Algorithm::default(),
            ignore: IgnoreMatcher::empty(),
            progress: Arc::new(NoopProgress),
            parallelism: 1,
            chunk_size: DEFAULT_CHUNK_SIZE,
            excluded: None,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_ignore(mut self, ignore: IgnoreMatcher) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Number of digest workers. `1` is sequential, `0` uses every available core.
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Read buffer size for digesting (clamped to at least 1 byte)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Leave the directory at `dir` out of the walk (used for a records
    /// directory that lives under the root)
    pub fn with_excluded_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.excluded = Some(dir.into());
        self
    }

    /// Walk the tree and digest every regular file
    #[instrument(skip(self), fields(root = %self.root.display(), algorithm = %self.algorithm))]
    pub fn build(&self) -> Result<BuildOutcome, SnapshotError> {
        let start = Instant::now();
        let root = path::normalize_root(&self.root);
        let root_name = path::root_base_name(&root);
        let created_at = Local::now().naive_local();
        info!("Starting snapshot build");

        let mut walker = Walker::new(root.clone(), &self.ignore);
        if let Some(dir) = &self.excluded {
            walker = walker.with_excluded(path::normalize_root(dir));
        }
        let files = walker.walk()?;
        let state = BuildState::default();
        let workers = self.worker_count();

        if workers <= 1 {
            for item in files {
                self.process(&root, item, &state);
            }
        } else {
            debug!(workers, "Digesting in parallel");
            let queue = Mutex::new(files);
            std::thread::scope(|scope| {
                for _ in 0..workers {
                    scope.spawn(|| loop {
                        let next = queue.lock().next();
                        let Some(item) = next else {
                            break;
                        };
                        self.process(&root, item, &state);
                    });
                }
            });
        }

        let Digests {
            entries,
            collisions,
        } = state.digests.into_inner();
        let mut skipped = state.skipped.into_inner();
        for (key, count) in collisions {
            skipped.extend((0..count).map(|_| SkipRecord::new(key.clone(), COLLISION_REASON)));
        }
        skipped.sort();

        let processed = state.processed.load(Ordering::SeqCst);
        self.progress.on_finish(processed, skipped.len() as u64);

        info!(
            files = entries.len(),
            skipped = skipped.len(),
            duration_ms = start.elapsed().as_millis(),
            "Snapshot build completed"
        );

        Ok(BuildOutcome {
            snapshot: Snapshot::new(root_name, created_at, entries).with_algorithm(self.algorithm),
            skipped,
        })
    }

    fn worker_count(&self) -> usize {
        match self.parallelism {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        }
    }

    fn process(&self, root: &Path, item: WalkItem, state: &BuildState) {
        let (file_path, outcome) = match item {
            Ok(file_path) => {
                let digest =
                    hasher::digest_file_chunked(&file_path, self.algorithm, self.chunk_size);
                let outcome = match digest {
                    Ok(digest) => self.record_digest(root, &file_path, digest, state),
                    Err(e) => {
                        let key = skip_key(root, &file_path);
                        warn!(path = %key, error = %e, "Skipping unreadable file");
                        state.skipped.lock().push(SkipRecord::new(key, e.to_string()));
                        FileOutcome::Skipped
                    }
                };
                (file_path, outcome)
            }
            Err(skip) => {
                warn!(path = %skip.path, reason = %skip.reason, "Skipping unreadable entry");
                let file_path = root.join(&skip.path);
                state.skipped.lock().push(skip);
                (file_path, FileOutcome::Skipped)
            }
        };

        let processed = state.processed.fetch_add(1, Ordering::SeqCst) + 1;
        let skipped = match outcome {
            FileOutcome::Skipped => state.skipped_count.fetch_add(1, Ordering::SeqCst) + 1,
            FileOutcome::Hashed => state.skipped_count.load(Ordering::SeqCst),
        };
        self.progress.on_file(&ProgressUpdate {
            path: &file_path,
            outcome,
            processed,
            skipped,
        });
    }

    fn record_digest(
        &self,
        root: &Path,
        file_path: &Path,
        digest: String,
        state: &BuildState,
    ) -> FileOutcome {
        let Some(key) = path::relative_key(root, file_path) else {
            let key = file_path.to_string_lossy().into_owned();
            warn!(path = %key, "File outside snapshot root");
            state
                .skipped
                .lock()
                .push(SkipRecord::new(key, "path is not under the snapshot root"));
            return FileOutcome::Skipped;
        };

        let mut digests = state.digests.lock();
        if let Some(count) = digests.collisions.get_mut(&key) {
            *count += 1;
            return FileOutcome::Skipped;
        }
        if digests.entries.remove(&key).is_some() {
            warn!(path = %key, "Several files map to the same relative path; skipping all of them");
            digests.collisions.insert(key, 2);
            return FileOutcome::Skipped;
        }
        digests.entries.insert(key, digest);
        FileOutcome::Hashed
    }
}

fn skip_key(root: &Path, file_path: &Path) -> String {
    path::relative_key(root, file_path).unwrap_or_else(|| file_path.to_string_lossy().into_owned())
}
