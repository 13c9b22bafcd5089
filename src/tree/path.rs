//! Path normalization for roots and snapshot keys

use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Base name used when a root has no final component (e.g. `/`)
pub const ROOT_SENTINEL: &str = "root";

/// Normalize a root path before use
///
/// Strips trailing separators, then resolves to an absolute path. Uses dunce
/// canonicalization when the path exists and falls back to a lexical absolute
/// path when it does not, so the caller can still report a useful error.
pub fn normalize_root(root: &Path) -> PathBuf {
    let trimmed = PathBuf::from(strip_trailing_separators(&root.to_string_lossy()));

    match dunce::canonicalize(&trimmed) {
        Ok(canonical) => canonical,
        Err(_) if trimmed.is_absolute() => trimmed,
        Err(_) => std::env::current_dir()
            .map(|cwd| cwd.join(&trimmed))
            .unwrap_or(trimmed),
    }
}

/// Base name of a root, or [`ROOT_SENTINEL`] when empty
pub fn root_base_name(root: &Path) -> String {
    let normalized = normalize_root(root);
    match normalized.file_name() {
        Some(name) if !name.is_empty() => name.to_string_lossy().nfc().collect(),
        _ => ROOT_SENTINEL.to_string(),
    }
}

/// Express `path` relative to `root` using `/` separators and NFC Unicode
///
/// Returns `None` when `path` is not under `root`.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_string_lossy().nfc().collect::<String>()),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

/// Final segment of a `/`-separated relative key
pub fn key_basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Remove trailing `/` or `\` (except for a bare root)
pub fn strip_trailing_separators(path: &str) -> String {
    let mut result = path.to_string();
    while result.len() > 1 && (result.ends_with('/') || result.ends_with('\\')) {
        result.pop();
    }
    result
}
