//! Filesystem walker for enumerating snapshot candidates

use crate::error::SnapshotError;
use crate::ignore::IgnoreMatcher;
use crate::snapshot::SkipRecord;
use crate::tree::path;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// One walker step: a regular file, or an entry the OS refused to enumerate
pub type WalkItem = Result<PathBuf, SkipRecord>;

/// Lazy sequence of regular files under a root
pub struct Files<'a> {
    inner: Box<dyn Iterator<Item = WalkItem> + Send + 'a>,
}

impl Iterator for Files<'_> {
    type Item = WalkItem;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Filesystem walker
///
/// Yields absolute paths of regular files only. Symlinks are never followed
/// and never yielded. Ignore rules are matched against file paths only, so a
/// rule that happens to match a directory name does not hide the files
/// inside it. An excluded directory is never descended into.
pub struct Walker<'a> {
    root: PathBuf,
    ignore: &'a IgnoreMatcher,
    excluded: Option<PathBuf>,
}

impl<'a> Walker<'a> {
    /// Create a walker for an already-normalized root
    pub fn new(root: PathBuf, ignore: &'a IgnoreMatcher) -> Self {
        Self {
            root,
            ignore,
            excluded: None,
        }
    }

    /// Skip the subtree at `dir` (an absolute, normalized path)
    pub fn with_excluded(mut self, dir: PathBuf) -> Self {
        self.excluded = Some(dir);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a fresh scan of the filesystem
    ///
    /// The root itself must be a readable directory; anything wrong with it is
    /// fatal. Problems below the root surface as `Err(SkipRecord)` items.
    /// Entries are visited in file-name order within each directory.
    pub fn walk(&self) -> Result<Files<'a>, SnapshotError> {
        let metadata = fs::metadata(&self.root).map_err(|source| SnapshotError::RootUnreadable {
            path: self.root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(SnapshotError::RootNotDirectory(self.root.clone()));
        }
        fs::read_dir(&self.root).map_err(|source| SnapshotError::RootUnreadable {
            path: self.root.clone(),
            source,
        })?;

        debug!(root = %self.root.display(), rules = self.ignore.len(), "Walking filesystem");

        let ignore = self.ignore;
        let excluded = self.excluded.clone();
        let skip_root = self.root.clone();

        let entries = WalkDir::new(&self.root)
            .follow_links(false)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !is_excluded_dir(excluded.as_deref(), entry))
            .filter_map(move |item| match item {
                Ok(entry) if entry.file_type().is_file() => {
                    if is_ignored_file(&skip_root, ignore, &entry) {
                        None
                    } else {
                        Some(Ok(entry.into_path()))
                    }
                }
                Ok(entry) => {
                    trace!(path = %entry.path().display(), "Not a regular file");
                    None
                }
                Err(err) => {
                    let key = err
                        .path()
                        .and_then(|p| path::relative_key(&skip_root, p))
                        .unwrap_or_else(|| {
                            err.path()
                                .unwrap_or(&skip_root)
                                .to_string_lossy()
                                .into_owned()
                        });
                    Some(Err(SkipRecord::new(key, err.to_string())))
                }
            });

        Ok(Files {
            inner: Box::new(entries),
        })
    }
}

fn is_excluded_dir(excluded: Option<&Path>, entry: &DirEntry) -> bool {
    match excluded {
        Some(dir) if entry.file_type().is_dir() && entry.path() == dir => {
            debug!(path = %dir.display(), "Skipping excluded directory");
            true
        }
        _ => false,
    }
}

fn is_ignored_file(root: &Path, ignore: &IgnoreMatcher, entry: &DirEntry) -> bool {
    if ignore.is_empty() {
        return false;
    }
    match path::relative_key(root, entry.path()) {
        Some(key) => {
            let ignored = ignore.is_ignored(&key);
            if ignored {
                trace!(path = %key, "Ignored by rule");
            }
            ignored
        }
        None => false,
    }
}
