//! Command-line interface definitions for dupescan.
//!
//! All arguments are defined with the clap derive API. The CLI layer only
//! collects values; validation happens in [`crate::config::ScanConfig`]
//! before any scanning starts.
//!
//! # Example
//!
//! ```bash
//! # Report exact duplicates under ~/Downloads
//! dupescan ~/Downloads
//!
//! # Quarantine duplicate copies and also look for near-duplicate text
//! dupescan ~/Downloads --move ~/dupes --find-near-text
//!
//! # Custom extensions and threshold, JSON to stdout
//! dupescan ~/notes --find-near-text --near-text-extensions .txt .md \
//!     --near-text-sim 0.85 --output json
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Find exact and near-duplicate files.
///
/// Scans a directory tree for files with identical content (BLAKE3
/// fingerprints), optionally moves duplicate copies into a quarantine
/// directory, and optionally reports highly similar text files.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory to scan
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Minimum file size in bytes to consider for duplicate detection
    #[arg(long, value_name = "BYTES", default_value_t = 1)]
    pub min_size: u64,

    /// Move exact duplicate copies into this directory (keeps one original
    /// per group)
    #[arg(long = "move", value_name = "DEST_DIR")]
    pub move_destination: Option<PathBuf>,

    /// Path to write the exact-duplicate CSV report
    #[arg(long, value_name = "CSV_PATH", default_value = "duplicates_report.csv")]
    pub report: PathBuf,

    /// Also search for near-duplicate text files and write a separate report
    #[arg(long)]
    pub find_near_text: bool,

    /// File extensions to treat as text for near-duplicate detection
    ///
    /// Defaults to common text/code extensions. Example:
    /// --near-text-extensions .txt .md
    #[arg(long, value_name = "EXT", num_args = 1..)]
    pub near_text_extensions: Option<Vec<String>>,

    /// Similarity threshold (0-1) for near-duplicate text files
    #[arg(long, value_name = "RATIO", default_value_t = 0.9)]
    pub near_text_sim: f64,

    /// Path to write the near-duplicate text CSV report
    #[arg(
        long,
        value_name = "CSV_PATH",
        default_value = "near_duplicates_text.csv"
    )]
    pub near_text_report: PathBuf,

    /// Output format: csv writes report files, json prints one document to
    /// stdout
    #[arg(short, long, value_enum, default_value = "csv")]
    pub output: OutputFormat,

    /// Report errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// CSV report files (exact and, if enabled, near-text)
    Csv,
    /// Single JSON document on stdout
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_minimal() {
        let cli = Cli::parse_from(["dupescan", "/tmp"]);

        assert_eq!(cli.root, PathBuf::from("/tmp"));
        assert_eq!(cli.min_size, 1);
        assert!(cli.move_destination.is_none());
        assert!(!cli.find_near_text);
        assert_eq!(cli.near_text_sim, 0.9);
        assert_eq!(cli.output, OutputFormat::Csv);
    }

    #[test]
    fn test_cli_full() {
        let cli = Cli::parse_from([
            "dupescan",
            "/data",
            "--min-size",
            "1024",
            "--move",
            "/quarantine",
            "--find-near-text",
            "--near-text-extensions",
            ".txt",
            ".md",
            "--near-text-sim",
            "0.85",
            "--output",
            "json",
            "-vv",
        ]);

        assert_eq!(cli.min_size, 1024);
        assert_eq!(cli.move_destination, Some(PathBuf::from("/quarantine")));
        assert!(cli.find_near_text);
        assert_eq!(
            cli.near_text_extensions,
            Some(vec![".txt".to_string(), ".md".to_string()])
        );
        assert_eq!(cli.near_text_sim, 0.85);
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["dupescan", "/tmp", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_requires_root() {
        let result = Cli::try_parse_from(["dupescan"]);
        assert!(result.is_err());
    }
}
