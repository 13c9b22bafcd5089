//! Snapshot comparison
//!
//! Classifies every path in the union of two snapshots as added, removed,
//! modified or unchanged. The four sets are disjoint and each is sorted.

use crate::snapshot::Snapshot;
use serde::Serialize;
use std::collections::BTreeMap;

/// How a path differs between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
    Unchanged,
}

impl ChangeKind {
    /// Line prefix used in text reports
    pub fn marker(&self) -> char {
        match self {
            ChangeKind::Added => '+',
            ChangeKind::Removed => '-',
            ChangeKind::Modified => '*',
            ChangeKind::Unchanged => '=',
        }
    }
}

/// Partition of two snapshots' paths
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    /// In new, not in old
    pub added: Vec<String>,
    /// In old, not in new
    pub removed: Vec<String>,
    /// In both, digests differ
    pub modified: Vec<String>,
    /// In both, digests equal
    pub unchanged: Vec<String>,
}

impl DiffResult {
    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty())
    }

    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }

    /// Size of the union of both snapshots' paths
    pub fn total_paths(&self) -> usize {
        self.change_count() + self.unchanged.len()
    }

    /// Paths in one bucket, sorted
    pub fn paths(&self, kind: ChangeKind) -> &[String] {
        match kind {
            ChangeKind::Added => &self.added,
            ChangeKind::Removed => &self.removed,
            ChangeKind::Modified => &self.modified,
            ChangeKind::Unchanged => &self.unchanged,
        }
    }
}

/// Compare a newer snapshot against an older one
pub fn diff(new: &Snapshot, old: &Snapshot) -> DiffResult {
    diff_entries(new.entries(), old.entries())
}

/// Compare two raw path→digest mappings
pub fn diff_entries(new: &BTreeMap<String, String>, old: &BTreeMap<String, String>) -> DiffResult {
    let mut result = DiffResult::default();

    // BTreeMap iteration is ordered, so every bucket comes out sorted
    for (path, digest) in new {
        match old.get(path) {
            None => result.added.push(path.clone()),
            Some(previous) if previous != digest => result.modified.push(path.clone()),
            Some(_) => result.unchanged.push(path.clone()),
        }
    }
    result.removed = old
        .keys()
        .filter(|path| !new.contains_key(*path))
        .cloned()
        .collect();

    result
}
