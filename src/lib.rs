//! Fingerprint: content snapshots of directory trees
//!
//! Walks a directory, digests every regular file, persists the path→digest
//! mapping as a timestamped record, and reports what was added, removed or
//! modified between the two most recent records of the same root.

pub mod cli;
pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod ignore;
pub mod logging;
pub mod progress;
pub mod snapshot;
pub mod store;
pub mod tree;

pub use diff::{diff, DiffResult};
pub use engine::{Comparison, FingerprintEngine, SnapshotOptions, SnapshotReport};
pub use error::{ApiError, SnapshotError};
pub use snapshot::{SkipRecord, Snapshot};
pub use store::{RecordId, SnapshotStore};
pub use tree::hasher::Algorithm;
