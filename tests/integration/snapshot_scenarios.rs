//! End-to-end snapshot scenarios: build, persist, mutate, compare.

use fingerprint::engine::{Comparison, FingerprintEngine, SnapshotOptions};
use fingerprint::ignore::IgnoreMatcher;
use fingerprint::snapshot::SnapshotBuilder;
use fingerprint::store::SnapshotStore;
use fingerprint::tree::hasher::{self, Algorithm};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn workspace() -> (TempDir, PathBuf, FingerprintEngine) {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("project");
    fs::create_dir_all(&root).unwrap();
    let engine = FingerprintEngine::new(
        SnapshotStore::new(temp_dir.path().join("hashes")),
        SnapshotOptions::default(),
    );
    (temp_dir, root, engine)
}

fn compared(engine: &FingerprintEngine, root: &std::path::Path) -> fingerprint::DiffResult {
    match engine.compare(root).unwrap() {
        Comparison::Compared { diff, .. } => diff,
        other => panic!("expected a comparison, got {:?}", other),
    }
}

#[test]
fn test_hello_world_snapshot() {
    let (_temp, root, engine) = workspace();
    fs::write(root.join("a.txt"), "hello").unwrap();
    fs::write(root.join("b.txt"), "world").unwrap();

    let outcome = engine.build(&root).unwrap();
    assert_eq!(outcome.skipped_count(), 0);

    let entries = outcome.snapshot.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        entries["a.txt"],
        hasher::digest_bytes(b"hello", Algorithm::Sha256)
    );
    assert_eq!(
        entries["b.txt"],
        hasher::digest_bytes(b"world", Algorithm::Sha256)
    );
}

#[test]
fn test_delete_and_modify_between_snapshots() {
    let (_temp, root, engine) = workspace();
    fs::write(root.join("a.txt"), "hello").unwrap();
    fs::write(root.join("b.txt"), "world").unwrap();
    engine.snapshot(&root).unwrap();

    fs::remove_file(root.join("b.txt")).unwrap();
    fs::write(root.join("a.txt"), "HELLO").unwrap();
    engine.snapshot(&root).unwrap();

    let diff = compared(&engine, &root);
    assert!(diff.added.is_empty());
    assert_eq!(diff.removed, vec!["b.txt"]);
    assert_eq!(diff.modified, vec!["a.txt"]);
    assert!(diff.unchanged.is_empty());
}

#[test]
fn test_added_file_in_nested_directory() {
    let (_temp, root, engine) = workspace();
    fs::write(root.join("keep.txt"), "k").unwrap();
    engine.snapshot(&root).unwrap();

    fs::create_dir_all(root.join("src").join("deep")).unwrap();
    fs::write(root.join("src").join("deep").join("new.rs"), "fn main() {}").unwrap();
    engine.snapshot(&root).unwrap();

    let diff = compared(&engine, &root);
    assert_eq!(diff.added, vec!["src/deep/new.rs"]);
    assert_eq!(diff.unchanged, vec!["keep.txt"]);
    assert_eq!(diff.change_count(), 1);
}

#[test]
fn test_modified_path_only_in_modified() {
    let (_temp, root, engine) = workspace();
    fs::write(root.join("doc.md"), "v1").unwrap();
    engine.snapshot(&root).unwrap();
    fs::write(root.join("doc.md"), "v2").unwrap();
    engine.snapshot(&root).unwrap();

    let diff = compared(&engine, &root);
    assert_eq!(diff.modified, vec!["doc.md"]);
    assert!(diff.added.is_empty() && diff.removed.is_empty() && diff.unchanged.is_empty());
}

#[test]
fn test_ignored_paths_never_recorded() {
    let (temp, root, _engine) = workspace();
    fs::create_dir_all(root.join("target").join("debug")).unwrap();
    fs::write(root.join("target").join("debug").join("app"), "bin").unwrap();
    fs::write(root.join("main.rs"), "code").unwrap();
    fs::write(root.join("notes.tmp"), "scratch").unwrap();
    fs::create_dir_all(root.join("a")).unwrap();
    fs::write(root.join("a").join("b.tmp"), "scratch").unwrap();

    let rules = temp.path().join("rules");
    fs::write(&rules, "# build output\ntarget/*\n*.tmp\n").unwrap();

    let engine = FingerprintEngine::new(
        SnapshotStore::new(temp.path().join("hashes")),
        SnapshotOptions {
            ignore_file: Some(rules),
            ..SnapshotOptions::default()
        },
    );
    let outcome = engine.build(&root).unwrap();
    let paths: Vec<_> = outcome.snapshot.paths().collect();
    assert_eq!(paths, vec!["main.rs"]);
}

#[test]
fn test_parallel_and_sequential_agree() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().to_path_buf();
    for d in 0..5 {
        let dir = root.join(format!("dir{}", d));
        fs::create_dir_all(&dir).unwrap();
        for f in 0..20 {
            fs::write(dir.join(format!("f{}.txt", f)), format!("{}-{}", d, f)).unwrap();
        }
    }

    let sequential = SnapshotBuilder::new(&root)
        .with_ignore(IgnoreMatcher::empty())
        .build()
        .unwrap();
    let parallel = SnapshotBuilder::new(&root)
        .with_parallelism(4)
        .with_chunk_size(3)
        .build()
        .unwrap();

    assert_eq!(sequential.snapshot.entries(), parallel.snapshot.entries());
    assert_eq!(sequential.skipped, parallel.skipped);
    assert_eq!(sequential.snapshot.len(), 100);
}

#[test]
fn test_missing_root_persists_nothing() {
    let (temp, root, engine) = workspace();
    let missing = root.join("does-not-exist");

    assert!(engine.snapshot(&missing).is_err());
    assert!(!temp.path().join("hashes").exists());
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped_not_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, root, engine) = workspace();
    fs::write(root.join("ok.txt"), "fine").unwrap();
    let locked = root.join("locked.txt");
    fs::write(&locked, "secret").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not stop a privileged user
    if fs::read(&locked).is_ok() {
        return;
    }

    let report = engine.snapshot(&root).unwrap();
    assert_eq!(report.file_count, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, "locked.txt");

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
}
