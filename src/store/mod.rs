//! Snapshot record storage
//!
//! Snapshots are persisted as flat, human-readable JSON objects mapping
//! relative path to digest, one file per snapshot, inside a single records
//! directory. The directory is an explicit parameter so callers (and tests)
//! decide where history lives.
//!
//! Records are write-once. A save writes the full record to a hidden temp file
//! first and then links it into place without replacing anything. A record
//! name is therefore never visible before its content is complete, and a
//! same-second collision moves on to the next sequence suffix.

pub mod record;

pub use record::RecordId;

use crate::error::SnapshotError;
use crate::snapshot::Snapshot;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, PersistError};
use tracing::{debug, info, instrument, warn};

const TEMP_PREFIX: &str = ".hashes_";
const TEMP_SUFFIX: &str = ".tmp";

/// Location of a freshly written record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRecord {
    pub id: RecordId,
    pub path: PathBuf,
}

/// File-backed snapshot store rooted at a records directory
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Create a store for the given records directory. The directory is created
    /// on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &RecordId) -> PathBuf {
        self.dir.join(id.file_name())
    }

    /// Persist a snapshot under a new, timestamp-derived record name
    #[instrument(skip(self, snapshot), fields(root = snapshot.root_name(), files = snapshot.len()))]
    pub fn save(&self, snapshot: &Snapshot) -> Result<SavedRecord, SnapshotError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            SnapshotError::IoError(io::Error::new(
                e.kind(),
                format!("Failed to create records directory {:?}: {}", self.dir, e),
            ))
        })?;

        let serialized = serde_json::to_vec_pretty(snapshot.entries()).map_err(|e| {
            SnapshotError::IoError(io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to serialize snapshot: {}", e),
            ))
        })?;

        let temp = self.write_temp(&serialized)?;
        let (id, path) = self.publish(snapshot, temp)?;

        info!(record = %path.display(), "Snapshot record written");
        Ok(SavedRecord { id, path })
    }

    fn write_temp(&self, bytes: &[u8]) -> Result<NamedTempFile, SnapshotError> {
        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&self.dir)?;
        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;
        Ok(temp)
    }

    /// Link the finished temp file under the first free record name for this
    /// snapshot's second. Existing records are never replaced.
    fn publish(
        &self,
        snapshot: &Snapshot,
        mut temp: NamedTempFile,
    ) -> Result<(RecordId, PathBuf), SnapshotError> {
        let mut sequence = 0u32;
        loop {
            let id = RecordId::new(snapshot.root_name(), snapshot.created_at(), sequence);
            let path = self.path_for(&id);
            match temp.persist_noclobber(&path) {
                Ok(_) => return Ok((id, path)),
                Err(PersistError { error, file }) if error.kind() == io::ErrorKind::AlreadyExists => {
                    debug!(record = %path.display(), "Record name taken, trying next sequence");
                    temp = file;
                    sequence = sequence.checked_add(1).ok_or_else(|| {
                        SnapshotError::IoError(io::Error::new(
                            io::ErrorKind::AlreadyExists,
                            "Exhausted record sequence numbers",
                        ))
                    })?;
                }
                Err(e) => return Err(SnapshotError::IoError(e.error)),
            }
        }
    }

    /// All records for a root base name, newest first
    pub fn list(&self, root_name: &str) -> Result<Vec<RecordId>, SnapshotError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SnapshotError::IoError(e)),
        };

        let mut records = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to read entry in {}: {}", self.dir.display(), e);
                    continue;
                }
            };
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Some(id) = RecordId::parse(root_name, name) {
                records.push(id);
            }
        }

        records.sort_by(|a, b| b.cmp(a));
        Ok(records)
    }

    /// Up to `n` most recent records for a root base name, newest first
    pub fn find_latest(&self, root_name: &str, n: usize) -> Result<Vec<RecordId>, SnapshotError> {
        let mut records = self.list(root_name)?;
        records.truncate(n);
        Ok(records)
    }

    /// Load a previously saved record
    pub fn load(&self, id: &RecordId) -> Result<Snapshot, SnapshotError> {
        let path = self.path_for(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SnapshotError::RecordNotFound(path));
            }
            Err(e) => return Err(SnapshotError::IoError(e)),
        };

        let entries: BTreeMap<String, String> =
            serde_json::from_slice(&bytes).map_err(|e| SnapshotError::RecordCorrupt {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        debug!(record = %path.display(), files = entries.len(), "Loaded snapshot record");
        Ok(Snapshot::new(id.root_name.clone(), id.timestamp, entries))
    }
}
