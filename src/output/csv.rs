//! CSV output formatters for scan results.
//!
//! Two reports are produced, matching the record shapes in the data model:
//!
//! - Exact duplicates: `group_id, hash, role, path` — one row per group
//!   member.
//! - Near-duplicate text pairs: `file_a, file_b, similarity_ratio` — ratio
//!   with 4 decimal places.

use std::io;
use std::path::Path;

use thiserror::Error;

use super::{duplicate_rows, similarity_rows};
use crate::duplicates::DuplicateGroup;
use crate::similarity::SimilarityPair;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// CSV formatter for the exact-duplicate report.
pub struct ExactCsvReport<'a> {
    groups: &'a [DuplicateGroup],
}

impl<'a> ExactCsvReport<'a> {
    /// Create a new formatter over the given groups.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self { groups }
    }

    /// Write the CSV report to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in duplicate_rows(self.groups) {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write the CSV report to a file path.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if the file cannot be created or written.
    pub fn write_to_path(&self, path: &Path) -> Result<(), CsvOutputError> {
        let file = std::fs::File::create(path)?;
        self.write_to(io::BufWriter::new(file))
    }

    /// Generate the CSV report as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_csv_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// CSV formatter for the near-duplicate text report.
pub struct NearTextCsvReport<'a> {
    pairs: &'a [SimilarityPair],
}

impl<'a> NearTextCsvReport<'a> {
    /// Create a new formatter over the given pairs.
    #[must_use]
    pub fn new(pairs: &'a [SimilarityPair]) -> Self {
        Self { pairs }
    }

    /// Write the CSV report to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in similarity_rows(self.pairs) {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write the CSV report to a file path.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if the file cannot be created or written.
    pub fn write_to_path(&self, path: &Path) -> Result<(), CsvOutputError> {
        let file = std::fs::File::create(path)?;
        self.write_to(io::BufWriter::new(file))
    }

    /// Generate the CSV report as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_csv_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
