//! Exact-duplicate grouping with multi-phase detection.
//!
//! # Overview
//!
//! This module implements the detection pipeline for exact duplicates:
//! 1. **Phase 1 - Size candidates**: apply the minimum-size filter and drop
//!    files whose size is unique (a file with a unique size cannot have an
//!    exact duplicate), so hashing only touches real candidates.
//! 2. **Phase 2 - Fingerprinting**: hash each candidate's full content in
//!    parallel, preserving traversal order of the results.
//! 3. **Phase 3 - Grouping**: bucket by fingerprint; only buckets with 2+
//!    members become a [`DuplicateGroup`].
//!
//! # Determinism
//!
//! Group IDs are assigned sequentially (starting at 1) in order of first
//! occurrence of each fingerprint in the input sequence. Within a group,
//! members are sorted by path and the lexicographically smallest path is
//! designated the original. Re-running the pipeline over an unchanged tree
//! therefore yields an identical `group_id` → original assignment, even
//! though hashing itself is parallel.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::scanner::{
    fingerprint_to_hex, passes_size_filter, FileRecord, Fingerprint, HashError, Hasher,
};

/// Role of a file within a duplicate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The one member per group that is kept in place.
    Original,
    /// Every other member; eligible for quarantine moves.
    Duplicate,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Original => write!(f, "original"),
            Role::Duplicate => write!(f, "duplicate"),
        }
    }
}

/// Confirmed group of content-identical files.
///
/// Invariants: all members share `fingerprint`, there are at least two
/// members, and members are sorted by path with the original first.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    /// Sequential group identifier, starting at 1
    pub group_id: usize,
    /// BLAKE3 content fingerprint shared by all members
    pub fingerprint: Fingerprint,
    /// Members sorted by path; index 0 is the original
    pub members: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// The member designated as original (lexicographically smallest path).
    #[must_use]
    pub fn original(&self) -> &FileRecord {
        &self.members[0]
    }

    /// Members with [`Role::Duplicate`], in path order.
    #[must_use]
    pub fn duplicates(&self) -> &[FileRecord] {
        &self.members[1..]
    }

    /// Role of the member at `index`.
    #[must_use]
    pub fn role_of(&self, index: usize) -> Role {
        if index == 0 {
            Role::Original
        } else {
            Role::Duplicate
        }
    }

    /// Fingerprint as a 64-char lowercase hex string.
    #[must_use]
    pub fn fingerprint_hex(&self) -> String {
        fingerprint_to_hex(&self.fingerprint)
    }

    /// Number of members in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Bytes that would be reclaimed by removing all duplicate copies.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.duplicates().iter().map(|f| f.size).sum()
    }
}

/// Statistics from the size-candidate phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizePassStats {
    /// Total files that entered the phase
    pub total_files: usize,
    /// Files excluded by the minimum-size filter
    pub below_min_size: usize,
    /// Files excluded because their size is unique
    pub unique_size: usize,
    /// Files that remain candidates for hashing
    pub candidates: usize,
}

/// Statistics from the fingerprint-grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Files that were successfully fingerprinted
    pub hashed_files: usize,
    /// Files whose content turned out to be unique
    pub unique_content: usize,
    /// Number of duplicate groups (2+ members)
    pub duplicate_groups: usize,
    /// Number of duplicate-role files across all groups
    pub duplicate_files: usize,
}

/// Phase 1: select hashing candidates by size.
///
/// Applies the minimum-size filter, then drops every file whose size is not
/// shared with at least one other surviving file. Output order matches input
/// order, which keeps downstream group-ID assignment deterministic.
///
/// This is pure computation over metadata; no file I/O is performed.
#[must_use]
pub fn size_candidates(
    records: Vec<FileRecord>,
    min_size_bytes: u64,
) -> (Vec<FileRecord>, SizePassStats) {
    let mut stats = SizePassStats {
        total_files: records.len(),
        ..Default::default()
    };

    let mut size_counts: HashMap<u64, usize> = HashMap::new();
    let mut filtered = Vec::with_capacity(records.len());

    for record in records {
        if !passes_size_filter(&record, min_size_bytes) {
            stats.below_min_size += 1;
            log::trace!(
                "Below minimum size ({} bytes): {}",
                record.size,
                record.path.display()
            );
            continue;
        }
        *size_counts.entry(record.size).or_insert(0) += 1;
        filtered.push(record);
    }

    let candidates: Vec<FileRecord> = filtered
        .into_iter()
        .filter(|record| {
            if size_counts[&record.size] > 1 {
                true
            } else {
                stats.unique_size += 1;
                false
            }
        })
        .collect();

    stats.candidates = candidates.len();
    log::info!(
        "Phase 1: {} files, {} below minimum size, {} unique by size, {} candidates",
        stats.total_files,
        stats.below_min_size,
        stats.unique_size,
        stats.candidates
    );

    (candidates, stats)
}

/// Phase 2: fingerprint each candidate's full content.
///
/// Hashing runs on the rayon thread pool; results come back in input order
/// so the grouping phase sees the same sequence a serial run would. Files
/// that fail to read are returned as per-file errors and excluded from
/// grouping, never aborting the scan.
#[must_use]
pub fn hash_candidates(
    candidates: Vec<FileRecord>,
    hasher: &Hasher,
) -> (Vec<(FileRecord, Fingerprint)>, Vec<HashError>) {
    let results: Vec<Result<(FileRecord, Fingerprint), HashError>> = candidates
        .into_par_iter()
        .map(|record| {
            hasher
                .hash_file(&record.path)
                .map(|fingerprint| (record, fingerprint))
        })
        .collect();

    let mut hashed = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(pair) => hashed.push(pair),
            Err(e) => {
                log::warn!("Failed to hash {}: {}", e.path().display(), e);
                errors.push(e);
            }
        }
    }

    log::info!(
        "Phase 2: {} files fingerprinted, {} unreadable",
        hashed.len(),
        errors.len()
    );

    (hashed, errors)
}

/// Phase 3: group fingerprinted files into [`DuplicateGroup`]s.
///
/// Pure computation. Buckets with a single member are discarded. Group IDs
/// follow first-occurrence order of each fingerprint in the input; members
/// are sorted by path so the lexicographically smallest path becomes the
/// original.
#[must_use]
pub fn group_by_fingerprint(
    hashed: Vec<(FileRecord, Fingerprint)>,
) -> (Vec<DuplicateGroup>, GroupingStats) {
    let mut stats = GroupingStats {
        hashed_files: hashed.len(),
        ..Default::default()
    };

    let mut buckets: HashMap<Fingerprint, Vec<FileRecord>> = HashMap::new();
    let mut first_seen: Vec<Fingerprint> = Vec::new();

    for (record, fingerprint) in hashed {
        let bucket = buckets.entry(fingerprint).or_default();
        if bucket.is_empty() {
            first_seen.push(fingerprint);
        }
        bucket.push(record);
    }

    let mut groups = Vec::new();
    for fingerprint in first_seen {
        let mut members = buckets.remove(&fingerprint).unwrap_or_default();
        if members.len() < 2 {
            stats.unique_content += members.len();
            continue;
        }
        members.sort_by(|a, b| a.path.cmp(&b.path));
        stats.duplicate_files += members.len() - 1;
        groups.push(DuplicateGroup {
            group_id: groups.len() + 1,
            fingerprint,
            members,
        });
    }

    stats.duplicate_groups = groups.len();
    log::info!(
        "Phase 3: {} duplicate groups, {} duplicate copies, {} unique by content",
        stats.duplicate_groups,
        stats.duplicate_files,
        stats.unique_content
    );

    (groups, stats)
}
