//! Application pipeline: wires the scanner, grouper, mover, scorer and
//! report writers together for one run.
//!
//! The exact-duplicate path and the near-text path share only the discovered
//! file list; either can run without the other. All per-file faults are
//! funneled into the report's skipped list so the final summary accounts for
//! every discovered file.

use anyhow::Context;
use bytesize::ByteSize;
use serde::Serialize;

use crate::cli::{Cli, OutputFormat};
use crate::config::{ConfigError, ScanConfig};
use crate::duplicates::{
    group_by_fingerprint, hash_candidates, move_duplicates, size_candidates, DuplicateGroup,
    MoveRecord,
};
use crate::error::ExitCode;
use crate::output::csv::{ExactCsvReport, NearTextCsvReport};
use crate::output::json::JsonReport;
use crate::scanner::{Hasher, SkippedFile, Walker};
use crate::similarity::{score_near_text, SimilarityPair};

/// Aggregate counters for one scan run.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ScanSummary {
    /// Files discovered by the walker
    pub total_files: usize,
    /// Files excluded by the minimum-size filter
    pub below_min_size: usize,
    /// Files excluded because their size is unique
    pub unique_size: usize,
    /// Files successfully fingerprinted
    pub hashed_files: usize,
    /// Duplicate groups found
    pub duplicate_groups: usize,
    /// Duplicate-role files across all groups
    pub duplicate_files: usize,
    /// Bytes occupied by duplicate copies
    pub wasted_bytes: u64,
    /// Duplicate copies relocated to the quarantine directory
    pub moved_files: usize,
    /// Moves that failed (files left in place)
    pub failed_moves: usize,
    /// Near-duplicate text pairs reported
    pub similar_pairs: usize,
    /// Files skipped for any reason (unreadable, undecodable, unmovable)
    pub skipped_files: usize,
}

/// Complete structured result of one scan run.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Exact-duplicate groups in deterministic group-ID order
    pub groups: Vec<DuplicateGroup>,
    /// Completed quarantine moves (empty when no destination configured)
    pub moves: Vec<MoveRecord>,
    /// Near-duplicate text pairs (empty when the pass is disabled)
    pub pairs: Vec<SimilarityPair>,
    /// Every file that dropped out of the pipeline, with its reason
    pub skipped: Vec<SkippedFile>,
    /// Aggregate counters
    pub summary: ScanSummary,
}

impl ScanReport {
    /// Whether any per-file fault occurred during the run.
    #[must_use]
    pub fn has_faults(&self) -> bool {
        !self.skipped.is_empty() || self.summary.failed_moves > 0
    }
}

/// Run the full scan pipeline for a validated-on-entry configuration.
///
/// Validates `config` first (fail fast, before any scan I/O), then runs the
/// exact-duplicate path (size filter, hashing, grouping, optional moves)
/// followed by the optional near-text path.
///
/// # Errors
///
/// Returns [`ConfigError`] for invalid configuration. Per-file faults never
/// surface as errors; they are recorded in the report.
pub fn run_scan(config: &ScanConfig) -> Result<ScanReport, ConfigError> {
    config.validate()?;

    let mut report = ScanReport::default();

    log::info!("Scanning: {}", config.root.display());
    let (records, walk_errors) = Walker::new(&config.root).collect_records();
    report.summary.total_files = records.len();
    for e in &walk_errors {
        report
            .skipped
            .push(SkippedFile::new(e.path().to_path_buf(), e.to_string()));
    }

    // Exact-duplicate path.
    let (candidates, size_stats) = size_candidates(records.clone(), config.min_size_bytes);
    report.summary.below_min_size = size_stats.below_min_size;
    report.summary.unique_size = size_stats.unique_size;

    let (hashed, hash_errors) = hash_candidates(candidates, &Hasher::new());
    report.summary.hashed_files = hashed.len();
    for e in &hash_errors {
        report
            .skipped
            .push(SkippedFile::new(e.path().to_path_buf(), e.to_string()));
    }

    let (groups, group_stats) = group_by_fingerprint(hashed);
    report.summary.duplicate_groups = group_stats.duplicate_groups;
    report.summary.duplicate_files = group_stats.duplicate_files;
    report.summary.wasted_bytes = groups.iter().map(DuplicateGroup::wasted_space).sum();
    report.groups = groups;

    if let Some(dest) = &config.move_destination {
        let move_report = move_duplicates(&report.groups, dest).map_err(|e| match e {
            crate::duplicates::MoveError::Destination { path, source } => {
                ConfigError::DestinationUncreatable { path, source }
            }
            other => ConfigError::DestinationUncreatable {
                path: dest.clone(),
                source: std::io::Error::other(other.to_string()),
            },
        })?;
        report.summary.moved_files = move_report.moved.len();
        report.summary.failed_moves = move_report.failed.len();
        for failed in &move_report.failed {
            report.skipped.push(SkippedFile::new(
                failed.source.clone(),
                failed.error.to_string(),
            ));
        }
        report.moves = move_report.moved;
    }

    // Near-duplicate text path, over the full discovered file list.
    if config.near_text.enabled {
        let (pairs, text_skipped, text_stats) = score_near_text(
            &records,
            &config.near_text.extensions,
            config.near_text.threshold,
        );
        report.summary.similar_pairs = text_stats.reported_pairs;
        report.skipped.extend(text_skipped);
        report.pairs = pairs;
    }

    report.summary.skipped_files = report.skipped.len();
    Ok(report)
}

/// Run the application: build the configuration from CLI arguments, scan,
/// write reports, and derive the exit code.
///
/// # Errors
///
/// Returns an error for invalid configuration or unwritable report files.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = ScanConfig::new(cli.root.clone()).with_min_size(cli.min_size);
    if let Some(dest) = &cli.move_destination {
        config = config.with_move_destination(dest.clone());
    }
    if cli.find_near_text {
        config = config.with_near_text(cli.near_text_sim);
        if let Some(extensions) = &cli.near_text_extensions {
            config = config.with_near_text_extensions(extensions);
        }
    }

    let report = run_scan(&config)?;

    match cli.output {
        OutputFormat::Csv => {
            ExactCsvReport::new(&report.groups)
                .write_to_path(&cli.report)
                .with_context(|| {
                    format!("Failed to write duplicate report to {}", cli.report.display())
                })?;
            log::info!("Exact-duplicate report written to {}", cli.report.display());

            if config.near_text.enabled {
                NearTextCsvReport::new(&report.pairs)
                    .write_to_path(&cli.near_text_report)
                    .with_context(|| {
                        format!(
                            "Failed to write near-text report to {}",
                            cli.near_text_report.display()
                        )
                    })?;
                log::info!(
                    "Near-duplicate text report written to {}",
                    cli.near_text_report.display()
                );
            }
        }
        OutputFormat::Json => {
            JsonReport::new(&report)
                .write_to(std::io::stdout().lock())
                .context("Failed to write JSON report")?;
        }
    }

    print_summary(&report);
    Ok(exit_code_for(&report))
}

/// Log the end-of-run summary, including skipped-file accounting.
fn print_summary(report: &ScanReport) {
    let s = &report.summary;
    log::info!(
        "{} files scanned, {} duplicate groups, {} duplicate copies ({} wasted)",
        s.total_files,
        s.duplicate_groups,
        s.duplicate_files,
        ByteSize(s.wasted_bytes)
    );
    if s.moved_files > 0 || s.failed_moves > 0 {
        log::info!(
            "{} duplicate copies moved, {} moves failed",
            s.moved_files,
            s.failed_moves
        );
    }
    if s.similar_pairs > 0 {
        log::info!("{} near-duplicate text pairs found", s.similar_pairs);
    }
    if !report.skipped.is_empty() {
        log::warn!("{} files skipped:", report.skipped.len());
        for skipped in &report.skipped {
            log::warn!("  {}: {}", skipped.path.display(), skipped.reason);
        }
    }
}

/// Derive the process exit code from the report.
fn exit_code_for(report: &ScanReport) -> ExitCode {
    if report.has_faults() {
        ExitCode::PartialSuccess
    } else if report.groups.is_empty() && report.pairs.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    }
}
