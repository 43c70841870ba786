//! Scan configuration and validation.
//!
//! Configuration faults are precondition violations: they are reported
//! before any file is read or moved, never as runtime faults mid-scan.

use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

/// Default extensions treated as text for near-duplicate detection.
pub const DEFAULT_TEXT_EXTENSIONS: &[&str] = &[
    ".txt", ".md", ".py", ".js", ".ts", ".json", ".csv", ".html", ".htm", ".css", ".java", ".c",
    ".cpp", ".cs",
];

/// Invalid configuration errors. All of these fail fast.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The root directory does not exist.
    #[error("Root directory does not exist: {0}")]
    RootNotFound(PathBuf),

    /// The root path is not a directory.
    #[error("Root path is not a directory: {0}")]
    RootNotADirectory(PathBuf),

    /// The similarity threshold is outside [0.0, 1.0].
    #[error("Similarity threshold must be in [0.0, 1.0], got {0}")]
    ThresholdOutOfRange(f64),

    /// The move destination cannot be created.
    #[error("Cannot create move destination {path}: {source}")]
    DestinationUncreatable {
        /// Destination directory path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Near-duplicate text detection settings.
#[derive(Debug, Clone)]
pub struct NearTextConfig {
    /// Whether the near-duplicate pass runs at all
    pub enabled: bool,
    /// Allowed extensions, lowercase with leading dot
    pub extensions: BTreeSet<String>,
    /// Minimum similarity ratio to report
    pub threshold: f64,
}

impl Default for NearTextConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            extensions: DEFAULT_TEXT_EXTENSIONS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            threshold: 0.9,
        }
    }
}

/// Immutable configuration for one scan run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root directory to scan
    pub root: PathBuf,
    /// Minimum file size in bytes for exact-duplicate detection
    pub min_size_bytes: u64,
    /// Quarantine directory; `None` means the exact pipeline is report-only
    pub move_destination: Option<PathBuf>,
    /// Near-duplicate text settings
    pub near_text: NearTextConfig,
}

impl ScanConfig {
    /// Create a configuration with defaults for the given root.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            min_size_bytes: 1,
            move_destination: None,
            near_text: NearTextConfig::default(),
        }
    }

    /// Set the minimum file size.
    #[must_use]
    pub fn with_min_size(mut self, min_size_bytes: u64) -> Self {
        self.min_size_bytes = min_size_bytes;
        self
    }

    /// Set the quarantine destination, enabling the mover.
    #[must_use]
    pub fn with_move_destination(mut self, destination: PathBuf) -> Self {
        self.move_destination = Some(destination);
        self
    }

    /// Enable near-duplicate text detection with the given threshold.
    #[must_use]
    pub fn with_near_text(mut self, threshold: f64) -> Self {
        self.near_text.enabled = true;
        self.near_text.threshold = threshold;
        self
    }

    /// Replace the text extension allow-list.
    ///
    /// Extensions are normalized to lowercase with a leading dot, so
    /// `"txt"`, `".txt"` and `".TXT"` are all accepted spellings.
    #[must_use]
    pub fn with_near_text_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.near_text.extensions = extensions
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .collect();
        self
    }

    /// Validate the configuration, creating the move destination if set.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a missing root, a root that is not a
    /// directory, a threshold outside [0.0, 1.0], or an uncreatable move
    /// destination. Called before any scan I/O so a bad configuration has
    /// no side effects beyond destination creation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.root.exists() {
            return Err(ConfigError::RootNotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ConfigError::RootNotADirectory(self.root.clone()));
        }
        if !(0.0..=1.0).contains(&self.near_text.threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.near_text.threshold));
        }
        if let Some(dest) = &self.move_destination {
            std::fs::create_dir_all(dest).map_err(|e| ConfigError::DestinationUncreatable {
                path: dest.clone(),
                source: e,
            })?;
        }
        Ok(())
    }
}

/// Normalize an extension to lowercase with a leading dot.
#[must_use]
pub fn normalize_extension(ext: &str) -> String {
    let lower = ext.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::new(PathBuf::from("/tmp"));

        assert_eq!(config.min_size_bytes, 1);
        assert!(config.move_destination.is_none());
        assert!(!config.near_text.enabled);
        assert_eq!(config.near_text.threshold, 0.9);
        assert!(config.near_text.extensions.contains(".txt"));
        assert!(config.near_text.extensions.contains(".cpp"));
    }

    #[test]
    fn test_validate_missing_root() {
        let config = ScanConfig::new(PathBuf::from("/no/such/dir"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RootNotFound(_))
        ));
    }

    #[test]
    fn test_validate_root_is_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();

        let config = ScanConfig::new(file);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RootNotADirectory(_))
        ));
    }

    #[test]
    fn test_validate_threshold_range() {
        let dir = TempDir::new().unwrap();

        let config = ScanConfig::new(dir.path().to_path_buf()).with_near_text(1.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOutOfRange(_))
        ));

        let config = ScanConfig::new(dir.path().to_path_buf()).with_near_text(-0.1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOutOfRange(_))
        ));

        let config = ScanConfig::new(dir.path().to_path_buf()).with_near_text(1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_creates_destination() {
        let root = TempDir::new().unwrap();
        let dest = root.path().join("quarantine").join("nested");

        let config =
            ScanConfig::new(root.path().to_path_buf()).with_move_destination(dest.clone());
        config.validate().unwrap();

        assert!(dest.is_dir());
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("txt"), ".txt");
        assert_eq!(normalize_extension(".TXT"), ".txt");
        assert_eq!(normalize_extension(".md"), ".md");
    }

    #[test]
    fn test_with_near_text_extensions_normalizes() {
        let config = ScanConfig::new(PathBuf::from("/tmp"))
            .with_near_text_extensions(["txt", ".MD", "Rs"]);

        assert!(config.near_text.extensions.contains(".txt"));
        assert!(config.near_text.extensions.contains(".md"));
        assert!(config.near_text.extensions.contains(".rs"));
        assert_eq!(config.near_text.extensions.len(), 3);
    }
}
