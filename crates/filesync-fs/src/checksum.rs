//! SHA-256 content digests
//!
//! Provides a single canonical digest format (`sha256:<hex>`) used as the
//! fingerprint of file content. Digests depend on file bytes only, never on
//! metadata, path, or timestamps.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::{Error, Result};

/// Prefix for all digests produced by this module
const PREFIX: &str = "sha256:";

/// Read buffer size for streaming file content through the hasher
const CHUNK_SIZE: usize = 64 * 1024;

/// A content digest in canonical `sha256:<hex>` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Wrap an already formatted digest string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Digest {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Compute the digest of in-memory content.
pub fn compute_content_checksum(content: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(content);
    Digest(format!("{}{:x}", PREFIX, hasher.finalize()))
}

/// Compute the digest of a file's contents.
///
/// The file is streamed through the hasher, so the result is identical to
/// [`compute_content_checksum`] over the full file bytes.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if `path` is not a regular file, and
/// [`Error::Io`] if it cannot be opened or read.
pub fn compute_file_checksum(path: &Path) -> Result<Digest> {
    if !path.is_file() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }

    let mut file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::io(path, e),
    })?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let read = file.read(&mut buf).map_err(|e| Error::io(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    tracing::trace!(path = %path.display(), "computed file digest");
    Ok(Digest(format!("{}{:x}", PREFIX, hasher.finalize())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_checksum_has_prefix() {
        let checksum = compute_content_checksum(b"hello world");
        assert!(checksum.as_str().starts_with("sha256:"));
    }

    #[test]
    fn content_checksum_is_deterministic() {
        let a = compute_content_checksum(b"test");
        let b = compute_content_checksum(b"test");
        assert_eq!(a, b);
    }

    #[test]
    fn different_content_different_checksum() {
        let a = compute_content_checksum(b"aaa");
        let b = compute_content_checksum(b"bbb");
        assert_ne!(a, b);
    }

    #[test]
    fn content_checksum_known_value() {
        let checksum = compute_content_checksum(b"hello world");
        assert_eq!(
            checksum.as_str(),
            "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn empty_file_has_empty_content_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();

        assert_eq!(
            compute_file_checksum(&path).unwrap(),
            compute_content_checksum(b"")
        );
    }

    #[test]
    fn file_checksum_matches_content_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.txt");
        std::fs::write(&path, "hello world").unwrap();

        let file_cs = compute_file_checksum(&path).unwrap();
        let content_cs = compute_content_checksum(b"hello world");
        assert_eq!(file_cs, content_cs);
    }

    #[test]
    fn file_larger_than_chunk_matches_content_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("large.bin");
        let content: Vec<u8> = (0..(CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &content).unwrap();

        assert_eq!(
            compute_file_checksum(&path).unwrap(),
            compute_content_checksum(&content)
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = compute_file_checksum(&dir.path().join("missing.txt"));
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[test]
    fn directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = compute_file_checksum(dir.path());
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[test]
    fn digest_serializes_as_plain_string() {
        let digest = compute_content_checksum(b"x");
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", digest));
    }
}
