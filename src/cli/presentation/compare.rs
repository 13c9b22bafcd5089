//! Comparison presentation.

use super::to_pretty_json;
use crate::diff::{ChangeKind, DiffResult};
use crate::error::ApiError;
use crate::store::RecordId;
use crate::tree::hasher::Algorithm;
use owo_colors::OwoColorize;

pub const NOT_ENOUGH_HISTORY: &str = "Not enough hash files to compare.";

const REPORTED: [ChangeKind; 3] = [ChangeKind::Added, ChangeKind::Removed, ChangeKind::Modified];

pub fn format_comparison_text(
    older: &RecordId,
    newer: &RecordId,
    diff: &DiffResult,
    color: bool,
) -> String {
    let mut s = format!("Comparing: {} -> {}", older, newer);

    if !diff.has_changes() {
        s.push_str("\nNo changes detected.");
        return s;
    }

    for kind in REPORTED {
        push_section(&mut s, kind, diff.paths(kind), color);
    }
    s
}

fn heading(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Added => "Added files:",
        ChangeKind::Removed => "Removed files:",
        ChangeKind::Modified => "Modified files:",
        ChangeKind::Unchanged => "Unchanged files:",
    }
}

fn push_section(out: &mut String, kind: ChangeKind, paths: &[String], color: bool) {
    if paths.is_empty() {
        return;
    }
    if color {
        out.push_str(&format!("\n{}", heading(kind).bold()));
    } else {
        out.push_str(&format!("\n{}", heading(kind)));
    }
    for path in paths {
        let line = format!("  {} {}", kind.marker(), path);
        if color {
            let painted = match kind {
                ChangeKind::Added => line.green().to_string(),
                ChangeKind::Removed => line.red().to_string(),
                ChangeKind::Modified => line.yellow().to_string(),
                ChangeKind::Unchanged => line.dimmed().to_string(),
            };
            out.push_str(&format!("\n{}", painted));
        } else {
            out.push_str(&format!("\n{}", line));
        }
    }
}

pub fn format_algorithm_mismatch_text(
    older: &RecordId,
    newer: &RecordId,
    older_algorithm: Algorithm,
    newer_algorithm: Algorithm,
) -> String {
    format!(
        "Comparing: {} -> {}\nCannot compare: records use different algorithms ({} vs {}). \
         Take a new snapshot with --algo {} to compare against {}.",
        older, newer, older_algorithm, newer_algorithm, older_algorithm, older
    )
}

pub fn format_algorithm_mismatch_json(
    older: &RecordId,
    newer: &RecordId,
    older_algorithm: Algorithm,
    newer_algorithm: Algorithm,
) -> Result<String, ApiError> {
    let out = serde_json::json!({
        "status": "algorithm_mismatch",
        "older": older.file_name(),
        "newer": newer.file_name(),
        "older_algorithm": older_algorithm,
        "newer_algorithm": newer_algorithm,
    });
    to_pretty_json(&out)
}

pub fn format_comparison_json(
    older: &RecordId,
    newer: &RecordId,
    diff: &DiffResult,
) -> Result<String, ApiError> {
    let out = serde_json::json!({
        "status": "compared",
        "older": older.file_name(),
        "newer": newer.file_name(),
        "added": diff.added,
        "removed": diff.removed,
        "modified": diff.modified,
        "unchanged_count": diff.unchanged.len(),
    });
    to_pretty_json(&out)
}

pub fn format_not_enough_history_json(found: usize) -> Result<String, ApiError> {
    let out = serde_json::json!({
        "status": "not_enough_history",
        "found": found,
    });
    to_pretty_json(&out)
}
