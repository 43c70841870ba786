//! Quarantine mover for duplicate copies.
//!
//! # Overview
//!
//! Relocates duplicate-role files into a destination directory. The design
//! goal is to be non-lossy and reversible: originals are never touched, no
//! file is ever overwritten, and a failed move of one file never rolls back
//! or blocks moves of the remaining files.
//!
//! Destination names carry the group fingerprint prefix and a per-group
//! index, `{stem}_DUP_{hash8}_{i}{ext}`, with a numeric suffix appended
//! until the name is free.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use super::DuplicateGroup;

/// Errors that can occur while moving a duplicate.
#[derive(Debug, Error)]
pub enum MoveError {
    /// The source file could not be moved.
    #[error("Failed to move {path}: {source}")]
    Io {
        /// Source path of the failed move
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The destination directory could not be created.
    #[error("Cannot create destination directory {path}: {source}")]
    Destination {
        /// Destination directory path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// A completed move of one duplicate copy.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MoveRecord {
    /// Where the file lived before the move
    pub source: PathBuf,
    /// Where the file lives now
    pub destination: PathBuf,
    /// Group the file belongs to
    pub group_id: usize,
}

/// A move that failed and was skipped.
#[derive(Debug)]
pub struct FailedMove {
    /// Source path that stayed in place
    pub source: PathBuf,
    /// Group the file belongs to
    pub group_id: usize,
    /// What went wrong
    pub error: MoveError,
}

/// Outcome of moving duplicates for a set of groups.
#[derive(Debug, Default)]
pub struct MoveReport {
    /// Successful moves, in processing order
    pub moved: Vec<MoveRecord>,
    /// Per-file failures; originals of these files remain untouched
    pub failed: Vec<FailedMove>,
}

impl MoveReport {
    /// Number of duplicate copies successfully relocated.
    #[must_use]
    pub fn moved_count(&self) -> usize {
        self.moved.len()
    }
}

/// Move every duplicate-role member of `groups` into `dest_root`.
///
/// The destination directory is created if it does not exist. Originals are
/// never moved. Each duplicate gets a collision-free name; a pre-existing
/// file at the destination is never overwritten. Failures are recorded
/// per file and processing continues.
///
/// # Errors
///
/// Returns [`MoveError::Destination`] only if the destination directory
/// itself cannot be created; everything else is a per-file failure inside
/// the returned [`MoveReport`].
pub fn move_duplicates(groups: &[DuplicateGroup], dest_root: &Path) -> Result<MoveReport, MoveError> {
    fs::create_dir_all(dest_root).map_err(|e| MoveError::Destination {
        path: dest_root.to_path_buf(),
        source: e,
    })?;

    let mut report = MoveReport::default();

    for group in groups {
        let hash8: String = group.fingerprint_hex().chars().take(8).collect();

        for (i, duplicate) in group.duplicates().iter().enumerate() {
            let destination = free_destination(dest_root, &duplicate.path, &hash8, i + 1);

            match move_file(&duplicate.path, &destination) {
                Ok(()) => {
                    log::debug!(
                        "Moved {} -> {}",
                        duplicate.path.display(),
                        destination.display()
                    );
                    report.moved.push(MoveRecord {
                        source: duplicate.path.clone(),
                        destination,
                        group_id: group.group_id,
                    });
                }
                Err(e) => {
                    log::warn!("Failed to move {}: {}", duplicate.path.display(), e);
                    report.failed.push(FailedMove {
                        source: duplicate.path.clone(),
                        group_id: group.group_id,
                        error: MoveError::Io {
                            path: duplicate.path.clone(),
                            source: e,
                        },
                    });
                }
            }
        }
    }

    log::info!(
        "Moved {} duplicate copies to {} ({} failures)",
        report.moved.len(),
        dest_root.display(),
        report.failed.len()
    );

    Ok(report)
}

/// Build a destination path that does not collide with any existing file.
///
/// Base name is `{stem}_DUP_{hash8}_{index}{ext}`; if taken, a counter is
/// appended (`..._{index}_{counter}{ext}`) until a free name is found.
fn free_destination(dest_root: &Path, source: &Path, hash8: &str, index: usize) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    let ext = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut candidate = dest_root.join(format!("{stem}_DUP_{hash8}_{index}{ext}"));
    let mut counter = 1;
    while candidate.exists() {
        candidate = dest_root.join(format!("{stem}_DUP_{hash8}_{index}_{counter}{ext}"));
        counter += 1;
    }
    candidate
}

/// Rename with a copy+remove fallback for cross-device moves.
fn move_file(source: &Path, destination: &Path) -> Result<(), std::io::Error> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            // Rename cannot cross filesystems; fall back to copy + remove.
            match fs::copy(source, destination) {
                Ok(_) => fs::remove_file(source),
                Err(_) => Err(rename_err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FileRecord;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap().write_all(content).unwrap();
        path
    }

    fn group_of(paths: Vec<PathBuf>, size: u64) -> DuplicateGroup {
        let mut members: Vec<FileRecord> = paths
            .into_iter()
            .map(|p| FileRecord::new(p, size))
            .collect();
        members.sort_by(|a, b| a.path.cmp(&b.path));
        DuplicateGroup {
            group_id: 1,
            fingerprint: [0x42; 32],
            members,
        }
    }

    #[test]
    fn test_moves_duplicates_keeps_original() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let a = write_file(src.path(), "a.txt", b"dup");
        let b = write_file(src.path(), "b.txt", b"dup");

        let group = group_of(vec![a.clone(), b.clone()], 3);
        let report = move_duplicates(&[group], dest.path()).unwrap();

        assert_eq!(report.moved.len(), 1);
        assert!(report.failed.is_empty());
        // Original (lexicographically smallest) stays in place.
        assert!(a.exists());
        assert!(!b.exists());
        assert!(report.moved[0].destination.exists());
        assert_eq!(report.moved[0].group_id, 1);
    }

    #[test]
    fn test_destination_name_carries_hash_prefix() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let a = write_file(src.path(), "a.txt", b"dup");
        let b = write_file(src.path(), "dup.txt", b"dup");

        let group = group_of(vec![a, b], 3);
        let report = move_duplicates(&[group], dest.path()).unwrap();

        let name = report.moved[0]
            .destination
            .file_name()
            .unwrap()
            .to_string_lossy()
            .to_string();
        assert_eq!(name, "dup_DUP_42424242_1.txt");
    }

    #[test]
    fn test_collision_never_overwrites() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let a = write_file(src.path(), "a.txt", b"dup");
        let b = write_file(src.path(), "dup.txt", b"dup");
        // Pre-existing file at the exact name the mover would pick.
        let occupied = write_file(dest.path(), "dup_DUP_42424242_1.txt", b"precious");

        let group = group_of(vec![a, b], 3);
        let report = move_duplicates(&[group], dest.path()).unwrap();

        assert_eq!(report.moved.len(), 1);
        // Pre-existing content untouched, moved file got a counter suffix.
        assert_eq!(fs::read(&occupied).unwrap(), b"precious");
        assert_eq!(
            report.moved[0]
                .destination
                .file_name()
                .unwrap()
                .to_string_lossy(),
            "dup_DUP_42424242_1_1.txt"
        );
        assert_eq!(fs::read(&report.moved[0].destination).unwrap(), b"dup");
    }

    #[test]
    fn test_creates_destination_directory() {
        let src = TempDir::new().unwrap();
        let dest_parent = TempDir::new().unwrap();
        let dest = dest_parent.path().join("quarantine");
        let a = write_file(src.path(), "a.txt", b"dup");
        let b = write_file(src.path(), "b.txt", b"dup");

        let group = group_of(vec![a, b], 3);
        let report = move_duplicates(&[group], &dest).unwrap();

        assert!(dest.is_dir());
        assert_eq!(report.moved.len(), 1);
    }

    #[test]
    fn test_missing_source_is_per_file_failure() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let a = write_file(src.path(), "a.txt", b"dup");
        let gone = src.path().join("gone.txt");
        let c = write_file(src.path(), "z.txt", b"dup");

        let group = group_of(vec![a, gone, c.clone()], 3);
        let report = move_duplicates(&[group], dest.path()).unwrap();

        // The vanished file fails, the remaining duplicate still moves.
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.moved.len(), 1);
        assert!(!c.exists());
    }

    #[test]
    fn test_no_duplicates_no_moves() {
        let dest = TempDir::new().unwrap();
        let report = move_duplicates(&[], dest.path()).unwrap();
        assert!(report.moved.is_empty());
        assert!(report.failed.is_empty());
    }
}
