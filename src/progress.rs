//! Progress reporting for snapshot builds.
//!
//! Builders call a [`ProgressReporter`] once per processed file. The default is
//! [`NoopProgress`]; callers that want feedback inject a closure or the
//! tracing-backed [`LogProgress`].

use std::path::Path;
use tracing::info;

/// Outcome for a single processed file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Hashed,
    Skipped,
}

/// Progress update emitted after each file
#[derive(Debug, Clone)]
pub struct ProgressUpdate<'a> {
    /// File that was just processed
    pub path: &'a Path,
    pub outcome: FileOutcome,
    /// Files processed so far (hashed + skipped)
    pub processed: u64,
    /// Files skipped so far
    pub skipped: u64,
}

/// Receives per-file progress. Must be shareable across digest workers.
pub trait ProgressReporter: Send + Sync {
    fn on_file(&self, update: &ProgressUpdate<'_>);

    /// Called once when the build finishes
    fn on_finish(&self, _processed: u64, _skipped: u64) {}
}

/// Reporter that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn on_file(&self, _update: &ProgressUpdate<'_>) {}
}

/// Reporter wrapping a closure
pub struct FnProgress<F> {
    callback: F,
}

impl<F> FnProgress<F>
where
    F: Fn(&ProgressUpdate<'_>) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for FnProgress<F>
where
    F: Fn(&ProgressUpdate<'_>) + Send + Sync,
{
    fn on_file(&self, update: &ProgressUpdate<'_>) {
        (self.callback)(update)
    }
}

/// Reporter that logs a line every `interval` files
#[derive(Debug, Clone, Copy)]
pub struct LogProgress {
    interval: u64,
}

impl LogProgress {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl ProgressReporter for LogProgress {
    fn on_file(&self, update: &ProgressUpdate<'_>) {
        if update.processed % self.interval == 0 {
            info!(
                processed = update.processed,
                skipped = update.skipped,
                "Hashing in progress"
            );
        }
    }

    fn on_finish(&self, processed: u64, skipped: u64) {
        info!(processed, skipped, "Hashing finished");
    }
}
