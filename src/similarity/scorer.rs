//! Text similarity scorer over eligible files.
//!
//! # Overview
//!
//! Applies [`similarity_ratio`](super::similarity_ratio) to every candidate
//! pair of text files and keeps the pairs that meet the configured
//! threshold. All-pairs comparison is quadratic, so candidates are pruned
//! before any content is read:
//!
//! - only files whose lowercase extension is in the allow-list take part;
//! - files are bucketed by `(parent directory, extension)`;
//! - within a bucket, files are sorted by size and each file is compared
//!   only against up to [`MAX_NEIGHBORS`] subsequent files whose size
//!   differs by at most 10% (with a 4 KiB floor).
//!
//! Files that fail to read or are not valid UTF-8 are skipped with a
//! recorded warning; a binary blob in the allow-list never aborts the scan.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use super::similarity_ratio;
use crate::scanner::{FileRecord, SkippedFile};

/// Neighbour cap within one size-sorted bucket.
const MAX_NEIGHBORS: usize = 50;

/// Absolute floor for the size tolerance window (4 KiB).
const SIZE_TOLERANCE_FLOOR: u64 = 4096;

/// A pair of files scoring at or above the similarity threshold.
///
/// `file_a` is always lexicographically smaller than `file_b`, giving each
/// unordered pair one canonical representation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimilarityPair {
    /// First file of the pair (lexicographically smaller path)
    pub file_a: PathBuf,
    /// Second file of the pair
    pub file_b: PathBuf,
    /// Similarity ratio in [0.0, 1.0]
    pub ratio: f64,
}

/// Statistics from the near-duplicate text pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NearTextStats {
    /// Files whose extension matched the allow-list
    pub eligible_files: usize,
    /// Pairs actually scored (after pruning)
    pub compared_pairs: usize,
    /// Pairs at or above the threshold
    pub reported_pairs: usize,
    /// Files skipped as unreadable or non-UTF-8
    pub skipped_files: usize,
}

/// Score near-duplicate text pairs among `records`.
///
/// `extensions` must hold lowercase dot-prefixed extensions (`".txt"`).
/// Returns reported pairs sorted by `(file_a, file_b)`, per-file skip
/// records, and pass statistics. Never emits a pair below `threshold` or a
/// pair involving a file outside the allow-list.
#[must_use]
pub fn score_near_text(
    records: &[FileRecord],
    extensions: &BTreeSet<String>,
    threshold: f64,
) -> (Vec<SimilarityPair>, Vec<SkippedFile>, NearTextStats) {
    let mut stats = NearTextStats::default();
    let mut skipped = Vec::new();

    // Bucket eligible files by (parent dir, extension).
    let mut buckets: BTreeMap<(PathBuf, String), Vec<&FileRecord>> = BTreeMap::new();
    for record in records {
        let Some(ext) = record.dot_extension() else {
            continue;
        };
        if !extensions.contains(&ext) {
            continue;
        }
        stats.eligible_files += 1;
        let parent = record
            .path
            .parent()
            .map_or_else(PathBuf::new, std::path::Path::to_path_buf);
        buckets.entry((parent, ext)).or_default().push(record);
    }

    let mut pairs = Vec::new();
    // Content cache: each file is read at most once per bucket pass.
    let mut contents: HashMap<PathBuf, Option<String>> = HashMap::new();

    for ((dir, ext), mut files) in buckets {
        if files.len() < 2 {
            continue;
        }
        log::debug!(
            "Scoring {} '{}' files in {}",
            files.len(),
            ext,
            dir.display()
        );

        // Sort by size (then path for determinism) so the comparison window
        // can stop early once sizes diverge.
        files.sort_by(|a, b| a.size.cmp(&b.size).then_with(|| a.path.cmp(&b.path)));

        for i in 0..files.len() {
            let file_i = files[i];
            let tolerance = (file_i.size / 10).max(SIZE_TOLERANCE_FLOOR);
            let mut checked = 0;

            for file_j in &files[i + 1..] {
                if checked >= MAX_NEIGHBORS {
                    break;
                }
                // Sorted by size, so later files only grow further apart.
                if file_j.size - file_i.size > tolerance {
                    break;
                }
                checked += 1;

                let Some(text_i) = read_text(file_i, &mut contents, &mut skipped) else {
                    break;
                };
                let text_i = text_i.to_string();
                let Some(text_j) = read_text(file_j, &mut contents, &mut skipped) else {
                    continue;
                };

                stats.compared_pairs += 1;
                let ratio = similarity_ratio(&text_i, text_j);
                if ratio >= threshold {
                    let (file_a, file_b) = if file_i.path < file_j.path {
                        (file_i.path.clone(), file_j.path.clone())
                    } else {
                        (file_j.path.clone(), file_i.path.clone())
                    };
                    pairs.push(SimilarityPair {
                        file_a,
                        file_b,
                        ratio,
                    });
                }
            }
        }
    }

    pairs.sort_by(|a, b| a.file_a.cmp(&b.file_a).then_with(|| a.file_b.cmp(&b.file_b)));

    stats.reported_pairs = pairs.len();
    stats.skipped_files = skipped.len();
    log::info!(
        "Near-text pass: {} eligible files, {} pairs compared, {} reported, {} skipped",
        stats.eligible_files,
        stats.compared_pairs,
        stats.reported_pairs,
        stats.skipped_files
    );

    (pairs, skipped, stats)
}

/// Read a file's text content through the cache.
///
/// Returns `None` (recording one skip entry on first failure) if the file
/// cannot be read or is not valid UTF-8.
fn read_text<'c>(
    record: &FileRecord,
    cache: &'c mut HashMap<PathBuf, Option<String>>,
    skipped: &mut Vec<SkippedFile>,
) -> Option<&'c str> {
    // Manual entry handling so a failed read is recorded exactly once.
    if !cache.contains_key(&record.path) {
        let loaded = match fs::read(&record.path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => Some(text),
                Err(_) => {
                    log::warn!("Not valid UTF-8, skipping: {}", record.path.display());
                    skipped.push(SkippedFile::new(record.path.clone(), "not valid UTF-8"));
                    None
                }
            },
            Err(e) => {
                log::warn!("Cannot read {}: {}", record.path.display(), e);
                skipped.push(SkippedFile::new(
                    record.path.clone(),
                    format!("read failed: {e}"),
                ));
                None
            }
        };
        cache.insert(record.path.clone(), loaded);
    }
    cache.get(&record.path).and_then(|o| o.as_deref())
}
