//! Property-based tests for determinism guarantees

use fingerprint::diff::diff_entries;
use fingerprint::ignore::IgnoreMatcher;
use fingerprint::snapshot::SnapshotBuilder;
use fingerprint::tree::hasher::{self, Algorithm};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use tempfile::TempDir;

fn algorithm() -> impl Strategy<Value = Algorithm> {
    prop_oneof![Just(Algorithm::Md5), Just(Algorithm::Sha256)]
}

fn entries() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z]{1,3}(/[a-z]{1,3})?", "[0-9a-f]{4}", 0..16)
}

/// Test that the chunk size never changes a digest
#[test]
fn test_digest_chunk_size_independence() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(prop::collection::vec(any::<u8>(), 0..4096), 1usize..2048, algorithm()),
            |(content, chunk_size, algorithm)| {
                let whole = hasher::digest_bytes(&content, algorithm);
                let chunked =
                    hasher::digest_reader(content.as_slice(), algorithm, chunk_size).unwrap();
                prop_assert_eq!(whole, chunked);
                Ok(())
            },
        )
        .unwrap();
}

/// Test that comparing a snapshot with itself reports no change
#[test]
fn test_self_diff_is_unchanged() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&entries(), |snapshot| {
            let result = diff_entries(&snapshot, &snapshot);
            prop_assert!(!result.has_changes());
            let keys: Vec<String> = snapshot.keys().cloned().collect();
            prop_assert_eq!(result.unchanged, keys);
            Ok(())
        })
        .unwrap();
}

/// Test that every path lands in exactly one category
#[test]
fn test_diff_partitions_union() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(entries(), entries()), |(new, old)| {
            let result = diff_entries(&new, &old);

            let union: BTreeSet<String> = new.keys().chain(old.keys()).cloned().collect();
            let mut seen = BTreeSet::new();
            for bucket in [&result.added, &result.removed, &result.modified, &result.unchanged] {
                let mut sorted = bucket.clone();
                sorted.sort();
                prop_assert_eq!(&sorted, bucket);
                for path in bucket {
                    prop_assert!(seen.insert(path.clone()));
                }
            }
            prop_assert_eq!(seen, union);

            for path in &result.modified {
                prop_assert_ne!(&new[path], &old[path]);
            }
            for path in &result.unchanged {
                prop_assert_eq!(&new[path], &old[path]);
            }
            Ok(())
        })
        .unwrap();
}

/// Test that adding a file to a tree always shows up as added
#[test]
fn test_added_file_detected() {
    let mut runner = proptest::test_runner::TestRunner::new(proptest::test_runner::Config {
        cases: 24,
        ..Default::default()
    });

    runner
        .run(
            &(
                prop::collection::btree_map("[a-z]{1,6}", prop::collection::vec(any::<u8>(), 0..64), 0..6),
                "[A-Z]{1,6}",
            ),
            |(files, added)| {
                let temp_dir = TempDir::new().unwrap();
                let root = temp_dir.path();
                for (name, content) in &files {
                    fs::write(root.join(name), content).unwrap();
                }
                let before = SnapshotBuilder::new(root).build().unwrap();

                // Upper-case names never collide with the lower-case originals
                let added_name = format!("{}.new", added);
                fs::write(root.join(&added_name), b"fresh").unwrap();
                let after = SnapshotBuilder::new(root).build().unwrap();

                let result = diff_entries(after.snapshot.entries(), before.snapshot.entries());
                prop_assert_eq!(result.added, vec![added_name]);
                prop_assert!(result.removed.is_empty());
                prop_assert!(result.modified.is_empty());
                Ok(())
            },
        )
        .unwrap();
}

/// Test that ignored names never appear in a built snapshot
#[test]
fn test_ignored_never_recorded() {
    let mut runner = proptest::test_runner::TestRunner::new(proptest::test_runner::Config {
        cases: 24,
        ..Default::default()
    });

    runner
        .run(
            &prop::collection::btree_set("[a-z]{1,6}\\.(txt|log)", 0..8),
            |names| {
                let temp_dir = TempDir::new().unwrap();
                let root = temp_dir.path();
                fs::create_dir_all(root.join("sub")).unwrap();
                for name in &names {
                    fs::write(root.join(name), name.as_bytes()).unwrap();
                    fs::write(root.join("sub").join(name), name.as_bytes()).unwrap();
                }

                let ignore = IgnoreMatcher::from_patterns(["*.log"]).unwrap();
                let outcome = SnapshotBuilder::new(root).with_ignore(ignore).build().unwrap();

                for path in outcome.snapshot.paths() {
                    prop_assert!(!path.ends_with(".log"));
                }
                let expected = names.iter().filter(|n| n.ends_with(".txt")).count() * 2;
                prop_assert_eq!(outcome.snapshot.len(), expected);
                Ok(())
            },
        )
        .unwrap();
}
