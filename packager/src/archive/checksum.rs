//! SHA-256 checksums for distribution archives.
//!
//! The checksum side-file holds the 64-character lowercase hex digest of
//! the archive bytes and nothing else, not even a trailing newline.

use super::naming::CHECKSUM_SUFFIX;
use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::io::Read;

/// A hex-encoded SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the SHA-256 digest of a file, reading it in chunks.
///
/// # Errors
///
/// Returns [`crate::error::PackagerError::Io`] if the file cannot be read.
pub fn compute_sha256(path: &Utf8Path) -> Result<Sha256Digest> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(Sha256Digest(format!("{:x}", hasher.finalize())))
}

/// Path of the checksum side-file for `archive_path`.
#[must_use]
pub fn checksum_path(archive_path: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{archive_path}{CHECKSUM_SUFFIX}"))
}

/// Hash `archive_path` and write the digest to its checksum side-file,
/// replacing any previous contents.
///
/// # Errors
///
/// Returns [`crate::error::PackagerError::Io`] if the archive cannot be read
/// or the side-file cannot be written.
pub fn write_checksum_file(archive_path: &Utf8Path) -> Result<(Utf8PathBuf, Sha256Digest)> {
    let digest = compute_sha256(archive_path)?;
    let path = checksum_path(archive_path);
    fs::write(&path, digest.as_str())?;
    Ok((path, digest))
}
