//! CLI parse: clap types for fingerprint. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// fingerprint - content snapshots of directory trees and change detection
#[derive(Parser, Debug)]
#[command(name = "fingerprint")]
#[command(about = "Fingerprint directory trees and detect what changed between snapshots")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding snapshot records (overrides storage.records_dir)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fingerprint every file under a directory and record the result
    Snapshot {
        /// Directory to fingerprint
        #[arg(required_unless_present = "drive", conflicts_with = "drive")]
        path: Option<PathBuf>,
        /// Fingerprint the whole filesystem from its root
        #[arg(long)]
        drive: bool,
        /// Digest algorithm (md5 or sha256)
        #[arg(long)]
        algo: Option<String>,
        /// Ignore rule file (default: <path>/.fingerprintignore)
        #[arg(long)]
        ignore_file: Option<PathBuf>,
        /// Digest workers (1 = sequential, 0 = one per core)
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Print the digest of a single file
    Digest {
        /// File to digest
        file: PathBuf,
        /// Digest algorithm (md5 or sha256)
        #[arg(long)]
        algo: Option<String>,
    },
    /// Compare the two most recent snapshots of a directory
    Compare {
        /// Directory whose snapshots to compare
        path: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List recorded snapshots of a directory, newest first
    History {
        /// Directory whose snapshots to list
        path: PathBuf,
        /// Show at most this many records
        #[arg(long)]
        limit: Option<usize>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Report format for `compare` and `history`
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
