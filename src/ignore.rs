//! Ignore rules for snapshots.
//!
//! Rules live in a newline-delimited file, by default `.fingerprintignore` at the
//! snapshot root. Blank lines and lines starting with `#` are skipped. Each
//! remaining line is a glob matched against both the full `/`-separated relative
//! path and its basename, so `*.tmp` excludes temp files anywhere while
//! `build/*` excludes one subtree. There is no negation; the first match wins.
//! A missing rule file means nothing is excluded.

use crate::error::SnapshotError;
use crate::tree::path::key_basename;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default ignore file name, looked up in the snapshot root
pub const IGNORE_FILE_NAME: &str = ".fingerprintignore";

/// Compiled set of ignore rules
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    patterns: Vec<String>,
    set: GlobSet,
}

impl Default for IgnoreMatcher {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }
}

impl IgnoreMatcher {
    /// Matcher with no rules (never ignores anything)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load rules from an ignore file. `None` or a missing file yields an empty matcher.
    pub fn load(source: Option<&Path>) -> Result<Self, SnapshotError> {
        let Some(path) = source else {
            return Ok(Self::empty());
        };

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No ignore file, nothing excluded");
                return Ok(Self::empty());
            }
            Err(e) => return Err(SnapshotError::IoError(e)),
        };

        let matcher = Self::from_patterns(parse_ignore_lines(&contents))?;
        debug!(
            path = %path.display(),
            rules = matcher.len(),
            "Loaded ignore rules"
        );
        Ok(matcher)
    }

    /// Build a matcher from in-memory patterns
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self, SnapshotError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(false)
                .build()
                .map_err(|e| SnapshotError::InvalidIgnorePattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| SnapshotError::InvalidIgnorePattern {
                pattern: patterns.join(", "),
                reason: e.to_string(),
            })?;

        Ok(Self { patterns, set })
    }

    /// Whether a `/`-separated relative path should be excluded
    pub fn is_ignored(&self, relative_path: &str) -> bool {
        if self.set.is_empty() {
            return false;
        }
        self.set.is_match(relative_path) || self.set.is_match(key_basename(relative_path))
    }

    /// Loaded patterns in file order
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Resolve which ignore file applies to a root: an explicit path wins, otherwise
/// `<root>/.fingerprintignore`.
pub fn ignore_file_for(root: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => root.join(IGNORE_FILE_NAME),
    }
}

/// Minimal parse: trim, skip empty and `#` lines
pub fn parse_ignore_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
