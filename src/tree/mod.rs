//! Filesystem traversal and content digesting
//!
//! Path normalization, the ignore-aware walker, and the streaming digest
//! function shared by snapshots and single-file digests.

pub mod hasher;
pub mod path;
pub mod walker;
