//! Command-line interface definitions.
//!
//! # Example
//!
//! ```bash
//! # Interactive review of the current directory
//! simdupe
//!
//! # Content duplicates by size + hash, as a JSON report
//! simdupe ~/Downloads --by-size --by-hash --output json
//!
//! # Versions and numbered sequences
//! simdupe ~/Renders --smart
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::duplicates::ScanMode;

/// Duplicate and similar-file finder with an interactive TUI.
///
/// Groups files by name, size or content, or detects versioned variants and
/// numbered sequences, then lets you select and remove the extras.
#[derive(Debug, Parser)]
#[command(name = "simdupe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan (defaults to the current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Group versions and numbered sequences instead of duplicates
    #[arg(long, conflicts_with_all = ["by_name", "by_size", "by_hash"])]
    pub smart: bool,

    /// Group files with the same name
    #[arg(long)]
    pub by_name: bool,

    /// Group files with the same size
    #[arg(long)]
    pub by_size: bool,

    /// Confirm groups by content hash
    #[arg(long)]
    pub by_hash: bool,

    /// Output format (tui for interactive, json for scripting)
    #[arg(short, long, value_enum, default_value = "tui")]
    pub output: OutputFormat,

    /// Read preferences from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The root to scan.
    #[must_use]
    pub fn root(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Scan mode chosen on the command line, if any.
    #[must_use]
    pub fn scan_mode(&self) -> Option<ScanMode> {
        if self.smart {
            Some(ScanMode::Smart)
        } else if self.by_name || self.by_size || self.by_hash {
            Some(ScanMode::simple(self.by_name, self.by_size, self.by_hash))
        } else {
            None
        }
    }
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Interactive terminal user interface
    Tui,
    /// JSON report on stdout
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Tui => write!(f, "tui"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
