//! Snapshots: path→digest mappings of a directory tree at one point in time.

pub mod builder;

pub use builder::{BuildOutcome, SnapshotBuilder};

use crate::tree::hasher::Algorithm;
use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable mapping from relative path to hex digest
///
/// Keys are `/`-separated paths relative to the snapshot root and iterate in
/// lexicographic order. The digest algorithm is inferred from the digests
/// themselves unless set explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    root_name: String,
    created_at: NaiveDateTime,
    algorithm: Option<Algorithm>,
    entries: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn new(
        root_name: impl Into<String>,
        created_at: NaiveDateTime,
        entries: BTreeMap<String, String>,
    ) -> Self {
        Self {
            root_name: root_name.into(),
            created_at: truncate_to_second(created_at),
            algorithm: Algorithm::detect(entries.values().map(String::as_str)),
            entries,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Snapshot stamped with the current local time
    pub fn captured_now(root_name: impl Into<String>, entries: BTreeMap<String, String>) -> Self {
        Self::new(root_name, Local::now().naive_local(), entries)
    }

    /// Base name of the root this snapshot was taken from
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Capture time, second granularity
    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Digest algorithm, if known
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.algorithm
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn truncate_to_second(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(0).unwrap_or(ts)
}

/// A file that could not be digested and was left out of the mapping
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkipRecord {
    /// Relative path of the skipped entry
    pub path: String,
    /// Why the entry could not be read
    pub reason: String,
}

impl SkipRecord {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
