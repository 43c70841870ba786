//! JSON output formatter for scan results.
//!
//! Serializes the full scan report (summary, groups, moves, near-duplicate
//! pairs and skipped files) as one JSON document for scripting.

use std::io;

use serde::Serialize;
use thiserror::Error;

use super::round_ratio;
use crate::app::ScanReport;

/// Errors that can occur during JSON output generation.
#[derive(Debug, Error)]
pub enum JsonOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during JSON serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct JsonFile {
    path: String,
    size: u64,
    role: crate::duplicates::Role,
}

#[derive(Serialize)]
struct JsonGroup {
    group_id: usize,
    hash: String,
    files: Vec<JsonFile>,
}

#[derive(Serialize)]
struct JsonPair {
    file_a: String,
    file_b: String,
    ratio: f64,
}

#[derive(Serialize)]
struct JsonMove {
    source: String,
    destination: String,
    group_id: usize,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    summary: &'a crate::app::ScanSummary,
    duplicate_groups: Vec<JsonGroup>,
    moves: Vec<JsonMove>,
    near_duplicate_pairs: Vec<JsonPair>,
    skipped: &'a [crate::scanner::SkippedFile],
}

/// JSON formatter for a complete scan report.
pub struct JsonReport<'a> {
    report: &'a ScanReport,
}

impl<'a> JsonReport<'a> {
    /// Create a new formatter over the given report.
    #[must_use]
    pub fn new(report: &'a ScanReport) -> Self {
        Self { report }
    }

    /// Write pretty-printed JSON to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `JsonOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> Result<(), JsonOutputError> {
        let document = self.build();
        serde_json::to_writer_pretty(&mut writer, &document)?;
        writeln!(writer)?;
        Ok(())
    }

    /// Generate the JSON report as a string.
    ///
    /// # Errors
    ///
    /// Returns `JsonOutputError` if serialization fails.
    pub fn to_json_string(&self) -> Result<String, JsonOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn build(&self) -> JsonDocument<'_> {
        let duplicate_groups = self
            .report
            .groups
            .iter()
            .map(|group| JsonGroup {
                group_id: group.group_id,
                hash: group.fingerprint_hex(),
                files: group
                    .members
                    .iter()
                    .enumerate()
                    .map(|(idx, member)| JsonFile {
                        path: member.path.to_string_lossy().into_owned(),
                        size: member.size,
                        role: group.role_of(idx),
                    })
                    .collect(),
            })
            .collect();

        let moves = self
            .report
            .moves
            .iter()
            .map(|m| JsonMove {
                source: m.source.to_string_lossy().into_owned(),
                destination: m.destination.to_string_lossy().into_owned(),
                group_id: m.group_id,
            })
            .collect();

        let near_duplicate_pairs = self
            .report
            .pairs
            .iter()
            .map(|pair| JsonPair {
                file_a: pair.file_a.to_string_lossy().into_owned(),
                file_b: pair.file_b.to_string_lossy().into_owned(),
                ratio: round_ratio(pair.ratio),
            })
            .collect();

        JsonDocument {
            summary: &self.report.summary,
            duplicate_groups,
            moves,
            near_duplicate_pairs,
            skipped: &self.report.skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{ScanReport, ScanSummary};
    use crate::duplicates::DuplicateGroup;
    use crate::scanner::FileRecord;
    use crate::similarity::SimilarityPair;
    use std::path::PathBuf;

    fn sample_report() -> ScanReport {
        ScanReport {
            groups: vec![DuplicateGroup {
                group_id: 1,
                fingerprint: [0xCD; 32],
                members: vec![
                    FileRecord::new(PathBuf::from("/a.txt"), 9),
                    FileRecord::new(PathBuf::from("/b.txt"), 9),
                ],
            }],
            moves: Vec::new(),
            pairs: vec![SimilarityPair {
                file_a: PathBuf::from("/x.md"),
                file_b: PathBuf::from("/y.md"),
                ratio: 0.987_654,
            }],
            skipped: Vec::new(),
            summary: ScanSummary {
                total_files: 4,
                duplicate_groups: 1,
                duplicate_files: 1,
                similar_pairs: 1,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_json_document_shape() {
        let report = sample_report();
        let json = JsonReport::new(&report).to_json_string().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["total_files"], 4);
        assert_eq!(value["duplicate_groups"][0]["group_id"], 1);
        assert_eq!(value["duplicate_groups"][0]["files"][0]["role"], "original");
        assert_eq!(
            value["duplicate_groups"][0]["files"][1]["role"],
            "duplicate"
        );
        assert_eq!(value["near_duplicate_pairs"][0]["ratio"], 0.9877);
    }

    #[test]
    fn test_json_empty_report() {
        let report = ScanReport::default();
        let json = JsonReport::new(&report).to_json_string().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["duplicate_groups"].as_array().unwrap().is_empty());
        assert!(value["near_duplicate_pairs"].as_array().unwrap().is_empty());
    }
}
