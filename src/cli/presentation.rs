//! CLI presentation: text and json formatters per command.

mod compare;
mod history;
mod snapshot;

pub use compare::{
    format_algorithm_mismatch_json, format_algorithm_mismatch_text, format_comparison_json,
    format_comparison_text, format_not_enough_history_json, NOT_ENOUGH_HISTORY,
};
pub use history::{format_history_json, format_history_text};
pub use snapshot::{format_digest_line, format_snapshot_report};

use crate::error::{ApiError, SnapshotError};

pub(crate) fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| {
        ApiError::Snapshot(SnapshotError::IoError(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to render JSON: {}", e),
        )))
    })
}
