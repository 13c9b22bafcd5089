//! History presentation.

use super::to_pretty_json;
use crate::error::ApiError;
use crate::store::{RecordId, SnapshotStore};
use comfy_table::Table;

pub fn format_history_text(root_name: &str, records: &[RecordId], store: &SnapshotStore) -> String {
    if records.is_empty() {
        return format!("No snapshots recorded for {}.", root_name);
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["#", "Record", "Captured At", "Location"]);
    for (i, id) in records.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            id.file_name(),
            id.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            store.path_for(id).display().to_string(),
        ]);
    }
    table.to_string()
}

pub fn format_history_json(records: &[RecordId], store: &SnapshotStore) -> Result<String, ApiError> {
    let arr: Vec<serde_json::Value> = records
        .iter()
        .map(|id| {
            serde_json::json!({
                "record": id.file_name(),
                "root": id.root_name,
                "captured_at": id.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "sequence": id.sequence,
                "path": store.path_for(id).display().to_string(),
            })
        })
        .collect();
    to_pretty_json(&arr)
}
