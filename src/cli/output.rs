//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, SnapshotError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::InsufficientHistory(_) => e.to_string(),
        _ => format!("Error: {}", e),
    }
}

/// Whether a snapshot error during comparison means the history itself is
/// unusable rather than the run failing outright.
pub fn is_history_error(e: &SnapshotError) -> bool {
    matches!(
        e,
        SnapshotError::RecordNotFound(_) | SnapshotError::RecordCorrupt { .. }
    )
}
