//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! Computes a 256-bit content fingerprint for a file by folding fixed-size
//! chunks into a running BLAKE3 state. Memory use is bounded by the chunk
//! size regardless of file size. Two files with equal fingerprints are
//! treated as content-identical; the collision risk of a 256-bit
//! cryptographic digest is negligible for this purpose.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::HashError;

/// A 256-bit content fingerprint.
pub type Fingerprint = [u8; 32];

/// Chunk size for streaming reads (1 MiB).
const CHUNK_SIZE: usize = 1024 * 1024;

/// Streaming BLAKE3 hasher.
///
/// Stateless between files; one instance can be shared across threads.
///
/// # Example
///
/// ```no_run
/// use dupescan::scanner::Hasher;
/// use std::path::Path;
///
/// let hasher = Hasher::new();
/// let fingerprint = hasher.hash_file(Path::new("/tmp/file.bin")).unwrap();
/// println!("{}", dupescan::scanner::fingerprint_to_hex(&fingerprint));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Hasher;

impl Hasher {
    /// Create a new hasher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hash the full content of the file at `path`.
    ///
    /// Reads in [`CHUNK_SIZE`] blocks so large files never have to fit in
    /// memory.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read. Callers
    /// are expected to treat this as a per-file fault and continue scanning.
    pub fn hash_file(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let mut file =
            File::open(path).map_err(|e| HashError::from_io(path.to_path_buf(), e))?;

        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; CHUNK_SIZE];

        loop {
            let read = file
                .read(&mut buffer)
                .map_err(|e| HashError::from_io(path.to_path_buf(), e))?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(*hasher.finalize().as_bytes())
    }
}

/// Convert a fingerprint to its lowercase hexadecimal form (64 chars).
#[must_use]
pub fn fingerprint_to_hex(fingerprint: &Fingerprint) -> String {
    let mut hex = String::with_capacity(64);
    for byte in fingerprint {
        use std::fmt::Write;
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}
