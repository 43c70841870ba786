//! Directory walker with deterministic traversal order.
//!
//! # Overview
//!
//! Walks a directory tree with [`walkdir`], sorting entries by file name at
//! every level. The stable ordering matters: duplicate group IDs are
//! assigned in first-occurrence order over this traversal, so an unchanged
//! tree must always produce the same file sequence.
//!
//! Symbolic links are not followed. Entries that cannot be read (permission
//! denied, vanished mid-walk) are surfaced as per-file [`ScanError`]s so the
//! caller can record them as skipped without aborting the scan.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{FileRecord, ScanError};

/// Deterministic directory walker producing [`FileRecord`]s.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
}

impl Walker {
    /// Create a new walker for the given root directory.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Walk the tree, yielding a [`FileRecord`] per regular file.
    ///
    /// Directory entries are visited in file-name order. Unreadable entries
    /// yield `Err(ScanError)` items instead of terminating the iterator.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        return None;
                    }
                    match entry.metadata() {
                        Ok(meta) => Some(Ok(FileRecord::new(
                            entry.path().to_path_buf(),
                            meta.len(),
                        ))),
                        Err(e) => Some(Err(classify_walkdir_error(
                            entry.path().to_path_buf(),
                            e,
                        ))),
                    }
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), Path::to_path_buf);
                    Some(Err(classify_walkdir_error(path, e)))
                }
            })
    }

    /// Collect all records, separating readable files from per-file faults.
    ///
    /// Convenience wrapper for the batch pipeline: the returned records are
    /// in deterministic traversal order.
    #[must_use]
    pub fn collect_records(&self) -> (Vec<FileRecord>, Vec<ScanError>) {
        let mut records = Vec::new();
        let mut errors = Vec::new();

        for item in self.walk() {
            match item {
                Ok(record) => records.push(record),
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    errors.push(e);
                }
            }
        }

        log::debug!(
            "Walk of {} found {} files ({} unreadable)",
            self.root.display(),
            records.len(),
            errors.len()
        );

        (records, errors)
    }
}

/// Map a walkdir error to the scanner error taxonomy.
fn classify_walkdir_error(path: PathBuf, e: walkdir::Error) -> ScanError {
    match e.io_error().map(std::io::Error::kind) {
        Some(std::io::ErrorKind::PermissionDenied) => ScanError::PermissionDenied(path),
        Some(std::io::ErrorKind::NotFound) => ScanError::NotFound(path),
        _ => ScanError::Io {
            path,
            source: e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("walk error")),
        },
    }
}
