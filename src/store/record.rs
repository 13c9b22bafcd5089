//! Record identifiers and file naming
//!
//! Records are named `hashes_{root}_{YYYYMMDD_HHMMSS}.json`. A second record
//! for the same root within the same second gets a `_{n}` suffix before the
//! extension. Ordering uses the parsed `(timestamp, sequence)` pair rather than
//! the raw file name, so `_10` sorts after `_9`.

use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::fmt;

pub const RECORD_PREFIX: &str = "hashes_";
pub const RECORD_EXTENSION: &str = ".json";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TIMESTAMP_LEN: usize = 15;

/// Identifies one persisted snapshot record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId {
    pub root_name: String,
    pub timestamp: NaiveDateTime,
    /// 0 for the first record in a given second
    pub sequence: u32,
}

impl RecordId {
    pub fn new(root_name: impl Into<String>, timestamp: NaiveDateTime, sequence: u32) -> Self {
        Self {
            root_name: root_name.into(),
            timestamp,
            sequence,
        }
    }

    /// Sortable timestamp token, e.g. `20240501_123045`
    pub fn timestamp_token(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn file_name(&self) -> String {
        let suffix = if self.sequence == 0 {
            String::new()
        } else {
            format!("_{}", self.sequence)
        };
        format!(
            "{}{}_{}{}{}",
            RECORD_PREFIX,
            self.root_name,
            self.timestamp_token(),
            suffix,
            RECORD_EXTENSION
        )
    }

    /// Parse a file name as a record of `root_name`
    ///
    /// Returns `None` for anything that is not strictly a record of exactly this
    /// root, including records of roots whose name merely starts with `root_name`.
    pub fn parse(root_name: &str, file_name: &str) -> Option<Self> {
        let rest = file_name
            .strip_prefix(RECORD_PREFIX)?
            .strip_prefix(root_name)?
            .strip_prefix('_')?
            .strip_suffix(RECORD_EXTENSION)?;

        let token = rest.get(..TIMESTAMP_LEN)?;
        let timestamp = NaiveDateTime::parse_from_str(token, TIMESTAMP_FORMAT).ok()?;

        let sequence = match &rest[TIMESTAMP_LEN..] {
            "" => 0,
            tail => {
                let digits = tail.strip_prefix('_')?;
                if digits.is_empty()
                    || digits.starts_with('0')
                    || !digits.bytes().all(|b| b.is_ascii_digit())
                {
                    return None;
                }
                digits.parse().ok()?
            }
        };

        Some(Self::new(root_name, timestamp, sequence))
    }
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then(self.sequence.cmp(&other.sequence))
            .then_with(|| self.root_name.cmp(&other.root_name))
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}
