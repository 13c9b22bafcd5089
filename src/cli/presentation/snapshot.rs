//! Snapshot and digest presentation.

use crate::engine::SnapshotReport;
use crate::tree::hasher::Algorithm;
use std::path::Path;

pub fn format_snapshot_report(report: &SnapshotReport) -> String {
    let mut s = format!("Hashes written to {}", report.record.path.display());
    if !report.skipped.is_empty() {
        s.push_str(&format!(
            "\nSkipped {} unreadable item(s).",
            report.skipped.len()
        ));
        for skip in &report.skipped {
            s.push_str(&format!("\n  {} ({})", skip.path, skip.reason));
        }
    }
    s
}

/// BSD-style digest line, e.g. `sha256(notes.txt) = 2cf2...`
pub fn format_digest_line(algorithm: Algorithm, path: &Path, digest: &str) -> String {
    format!("{}({}) = {}", algorithm, path.display(), digest)
}
