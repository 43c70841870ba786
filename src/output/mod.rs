//! Report assembly and serialization.
//!
//! The core pipeline produces structured results ([`crate::app::ScanReport`]);
//! this module flattens them into output records and serializes those to CSV
//! ([`csv`]) or JSON ([`json`]).

pub mod csv;
pub mod json;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, Role};
use crate::similarity::SimilarityPair;

/// One report row per duplicate-group member.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DuplicateRow {
    /// Group the file belongs to (1-based, sequential)
    pub group_id: usize,
    /// Full content fingerprint, lowercase hex
    pub hash: String,
    /// Whether this member is the kept original or a duplicate copy
    pub role: Role,
    /// Path to the file
    pub path: String,
}

/// One report row per near-duplicate text pair.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimilarityRow {
    /// First file of the pair
    pub file_a: String,
    /// Second file of the pair
    pub file_b: String,
    /// Ratio formatted with 4 decimal places
    pub similarity_ratio: String,
}

/// Flatten duplicate groups into one row per member.
///
/// Rows appear in group-ID order; within a group the original comes first.
#[must_use]
pub fn duplicate_rows(groups: &[DuplicateGroup]) -> Vec<DuplicateRow> {
    let mut rows = Vec::new();
    for group in groups {
        let hash = group.fingerprint_hex();
        for (idx, member) in group.members.iter().enumerate() {
            rows.push(DuplicateRow {
                group_id: group.group_id,
                hash: hash.clone(),
                role: group.role_of(idx),
                path: member.path.to_string_lossy().into_owned(),
            });
        }
    }
    rows
}

/// Flatten similarity pairs into report rows, fixing the ratio precision.
#[must_use]
pub fn similarity_rows(pairs: &[SimilarityPair]) -> Vec<SimilarityRow> {
    pairs
        .iter()
        .map(|pair| SimilarityRow {
            file_a: pair.file_a.to_string_lossy().into_owned(),
            file_b: pair.file_b.to_string_lossy().into_owned(),
            similarity_ratio: format!("{:.4}", pair.ratio),
        })
        .collect()
}

/// Round a ratio to 4 decimal places (for numeric JSON output).
#[must_use]
pub fn round_ratio(ratio: f64) -> f64 {
    (ratio * 10_000.0).round() / 10_000.0
}
