//! SHA-256 checksum utilities
//!
//! Cached and upstream requirements files are compared by content digest in
//! the canonical `sha256:<hex>` format.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::{Error, Result};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of raw bytes.
pub fn compute_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the SHA-256 checksum of a file's contents.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read.
pub fn compute_file_checksum(path: &Path) -> Result<String> {
    let content = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(compute_checksum(&content))
}
