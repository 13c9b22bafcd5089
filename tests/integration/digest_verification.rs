//! Digest Implementation Verification Tests
//!
//! Checks the streaming digest against the RustCrypto hashers used directly.

use fingerprint::tree::hasher::{self, Algorithm};
use md5::Md5;
use sha2::{Digest, Sha256};
use std::fs;
use tempfile::TempDir;

/// Test that the file digest matches SHA-256 computed in one shot
#[test]
fn test_file_digest_matches_sha256() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("data.bin");
    let content: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    fs::write(&file, &content).unwrap();

    let expected = hex::encode(Sha256::digest(&content));
    assert_eq!(hasher::digest_file(&file, Algorithm::Sha256).unwrap(), expected);
}

/// Test that the file digest matches MD5 computed in one shot
#[test]
fn test_file_digest_matches_md5() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("data.bin");
    let content = b"The quick brown fox jumps over the lazy dog";
    fs::write(&file, content).unwrap();

    assert_eq!(
        hasher::digest_file(&file, Algorithm::Md5).unwrap(),
        hex::encode(Md5::digest(content))
    );
    assert_eq!(
        hasher::digest_file(&file, Algorithm::Md5).unwrap(),
        "9e107d9d372bb6826bd81d3542a419d6"
    );
}

/// Test that identical content in different files digests identically
#[test]
fn test_identical_content_identical_digest() {
    let temp_dir = TempDir::new().unwrap();
    let a = temp_dir.path().join("a.txt");
    let b = temp_dir.path().join("nested_b.txt");
    fs::write(&a, "same bytes").unwrap();
    fs::write(&b, "same bytes").unwrap();

    for algorithm in [Algorithm::Md5, Algorithm::Sha256] {
        let da = hasher::digest_file(&a, algorithm).unwrap();
        let db = hasher::digest_file(&b, algorithm).unwrap();
        assert_eq!(da, db);
        assert_eq!(da.len(), algorithm.hex_len());
    }
}

/// Test that digests are lowercase hex
#[test]
fn test_digest_is_lowercase_hex() {
    let digest = hasher::digest_bytes(b"hello", Algorithm::Sha256);
    assert!(digest
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
}
