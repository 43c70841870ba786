//! dupescan - Exact and Near-Duplicate File Scanner
//!
//! A cross-platform Rust CLI application and library for finding files with
//! identical content (BLAKE3 fingerprints), safely quarantining duplicate
//! copies, and detecting near-duplicate text files via sequence-matcher
//! similarity ratios.

pub mod app;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod similarity;

pub use app::{run_app, run_scan, ScanReport, ScanSummary};
