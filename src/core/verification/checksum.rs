//! Checksum calculation for package verification
//!
//! Packages written by an export are hashed after the fact so the report can
//! show what landed on disk.

use crate::domain::{BackupError, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Size and SHA-256 of a package on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDigest {
    /// File size in bytes
    pub size_bytes: u64,

    /// Hex-encoded SHA-256 (64 characters)
    pub sha256: String,
}

/// Calculate SHA-256 checksum of raw bytes
///
/// Returns a hex-encoded SHA-256 checksum string (64 characters).
///
/// # Examples
///
/// ```
/// use ago_backup::core::verification::checksum::calculate_checksum_bytes;
///
/// let checksum = calculate_checksum_bytes(b"abc");
/// assert_eq!(
///     checksum,
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{result:x}")
}

/// Hash a file in fixed-size chunks
///
/// # Errors
///
/// Returns `Io` if the file cannot be opened or read.
pub fn digest_file(path: &Path) -> Result<PackageDigest> {
    let mut file = File::open(path).map_err(|e| {
        BackupError::Io(format!("Failed to open {} for hashing: {e}", path.display()))
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 64 * 1024];
    let mut size_bytes = 0u64;

    loop {
        let read = file.read(&mut buffer).map_err(|e| {
            BackupError::Io(format!("Failed to read {}: {e}", path.display()))
        })?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
        size_bytes += read as u64;
    }

    Ok(PackageDigest {
        size_bytes,
        sha256: format!("{:x}", hasher.finalize()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_calculate_checksum_bytes_deterministic() {
        let data = b"Test data";
        let checksum1 = calculate_checksum_bytes(data);
        let checksum2 = calculate_checksum_bytes(data);

        assert_eq!(checksum1, checksum2);
        assert_eq!(checksum1.len(), 64);
        assert!(checksum1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_digest_file_matches_bytes() {
        // Larger than one read buffer
        let contents: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&contents).unwrap();
        file.flush().unwrap();

        let digest = digest_file(file.path()).unwrap();
        assert_eq!(digest.size_bytes, contents.len() as u64);
        assert_eq!(digest.sha256, calculate_checksum_bytes(&contents));
    }

    #[test]
    fn test_digest_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let digest = digest_file(file.path()).unwrap();
        assert_eq!(digest.size_bytes, 0);
        assert_eq!(
            digest.sha256,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_digest_missing_file() {
        assert!(matches!(
            digest_file(Path::new("/nonexistent/package.zip")),
            Err(BackupError::Io(_))
        ));
    }
}
