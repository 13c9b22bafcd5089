//! Content digests for snapshot entries
//!
//! A digest is the lowercase hex encoding of a hash over a file's bytes. Files
//! are read in bounded chunks so memory stays flat for large inputs; the chunk
//! size never affects the resulting digest.

use crate::error::SnapshotError;
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Default read buffer for file digests (64 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// 128-bit MD5, 32 hex chars
    Md5,
    /// 256-bit SHA-256, 64 hex chars
    #[default]
    Sha256,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha256 => "sha256",
        }
    }

    /// Length of a hex digest produced by this algorithm
    pub fn hex_len(&self) -> usize {
        match self {
            Algorithm::Md5 => 32,
            Algorithm::Sha256 => 64,
        }
    }

    pub fn from_hex_len(len: usize) -> Option<Self> {
        match len {
            32 => Some(Algorithm::Md5),
            64 => Some(Algorithm::Sha256),
            _ => None,
        }
    }

    /// Infer the algorithm behind a set of hex digests
    ///
    /// `None` when there are no digests, when any length is unrecognized, or
    /// when the lengths disagree.
    pub fn detect<'a>(digests: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut found = None;
        for digest in digests {
            let algorithm = Self::from_hex_len(digest.len())?;
            match found {
                None => found = Some(algorithm),
                Some(seen) if seen != algorithm => return None,
                Some(_) => {}
            }
        }
        found
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = SnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(Algorithm::Md5),
            "sha256" => Ok(Algorithm::Sha256),
            _ => Err(SnapshotError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

/// Compute the digest of a file on disk using the default chunk size
pub fn digest_file(path: &Path, algorithm: Algorithm) -> io::Result<String> {
    digest_file_chunked(path, algorithm, DEFAULT_CHUNK_SIZE)
}

/// Compute the digest of a file on disk, reading `chunk_size` bytes at a time
///
/// A `chunk_size` of 0 is treated as 1.
pub fn digest_file_chunked(
    path: &Path,
    algorithm: Algorithm,
    chunk_size: usize,
) -> io::Result<String> {
    let file = File::open(path)?;
    digest_reader(file, algorithm, chunk_size)
}

/// Compute the digest of any byte stream
pub fn digest_reader<R: Read>(
    reader: R,
    algorithm: Algorithm,
    chunk_size: usize,
) -> io::Result<String> {
    match algorithm {
        Algorithm::Md5 => stream_digest::<Md5, R>(reader, chunk_size),
        Algorithm::Sha256 => stream_digest::<Sha256, R>(reader, chunk_size),
    }
}

/// Compute the digest of an in-memory buffer
pub fn digest_bytes(data: &[u8], algorithm: Algorithm) -> String {
    match algorithm {
        Algorithm::Md5 => hex::encode(Md5::digest(data)),
        Algorithm::Sha256 => hex::encode(Sha256::digest(data)),
    }
}

fn stream_digest<D: Digest, R: Read>(mut reader: R, chunk_size: usize) -> io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = vec![0u8; chunk_size.max(1)];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
