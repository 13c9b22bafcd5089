//! Property-based tests for digest and diff guarantees

mod determinism;
