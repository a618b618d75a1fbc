//! Requirements file cache
//!
//! Remote requirements files are addressed by `salt://` URIs. The
//! [`FileCache`] trait is the seam the acquirer talks to; [`LocalFileCache`]
//! serves those URIs from a file-server root directory and keeps copies
//! under a separate cache directory.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::checksum::compute_file_checksum;
use crate::{Error, Result, io};

/// URI scheme marking a requirements source as remote.
pub const REMOTE_SCHEME: &str = "salt://";

/// Fetch-by-URI cache with content hashing.
pub trait FileCache: Send + Sync {
    /// Path of the cached copy of `uri`, if one exists.
    fn is_cached(&self, uri: &str) -> Result<Option<PathBuf>>;

    /// Fetch `uri` into the cache, replacing any previous copy.
    ///
    /// Returns `None` when the upstream resource does not exist.
    fn cache_file(&self, uri: &str) -> Result<Option<PathBuf>>;

    /// Digest of the upstream resource, `None` when it does not exist.
    fn hash_remote(&self, uri: &str) -> Result<Option<String>>;

    /// Digest of a local file.
    fn hash_local(&self, path: &Path) -> Result<String> {
        compute_file_checksum(path)
    }
}

/// [`FileCache`] backed by two directories on the local host.
///
/// `salt://base/reqs.txt` maps to `<file_root>/base/reqs.txt` upstream and to
/// `<cache_dir>/base/reqs.txt` once cached.
#[derive(Debug, Clone)]
pub struct LocalFileCache {
    file_root: PathBuf,
    cache_dir: PathBuf,
}

impl LocalFileCache {
    pub fn new(file_root: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            file_root: file_root.into(),
            cache_dir: cache_dir.into(),
        }
    }

    pub fn file_root(&self) -> &Path {
        &self.file_root
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Strip the scheme and reject anything that could escape either root.
    fn relative_path(uri: &str) -> Result<PathBuf> {
        let rest = uri
            .strip_prefix(REMOTE_SCHEME)
            .ok_or_else(|| Error::InvalidCacheUri {
                uri: uri.to_string(),
                reason: format!("expected a {} URI", REMOTE_SCHEME),
            })?;

        let relative = PathBuf::from(rest);
        if rest.is_empty() {
            return Err(Error::InvalidCacheUri {
                uri: uri.to_string(),
                reason: "empty path".to_string(),
            });
        }
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => {
                    return Err(Error::InvalidCacheUri {
                        uri: uri.to_string(),
                        reason: "path must stay inside the file root".to_string(),
                    });
                }
            }
        }
        Ok(relative)
    }

    fn upstream_path(&self, uri: &str) -> Result<PathBuf> {
        Ok(self.file_root.join(Self::relative_path(uri)?))
    }

    fn cached_path(&self, uri: &str) -> Result<PathBuf> {
        Ok(self.cache_dir.join(Self::relative_path(uri)?))
    }
}

impl FileCache for LocalFileCache {
    fn is_cached(&self, uri: &str) -> Result<Option<PathBuf>> {
        let cached = self.cached_path(uri)?;
        if cached.is_file() {
            debug!(uri, path = %cached.display(), "requirements cache hit");
            Ok(Some(cached))
        } else {
            debug!(uri, "requirements cache miss");
            Ok(None)
        }
    }

    fn cache_file(&self, uri: &str) -> Result<Option<PathBuf>> {
        let upstream = self.upstream_path(uri)?;
        if !upstream.is_file() {
            debug!(uri, path = %upstream.display(), "upstream requirements file not found");
            return Ok(None);
        }

        let cached = self.cached_path(uri)?;
        io::copy_atomic(&upstream, &cached)?;
        debug!(uri, path = %cached.display(), "cached requirements file");
        Ok(Some(cached))
    }

    fn hash_remote(&self, uri: &str) -> Result<Option<String>> {
        let upstream = self.upstream_path(uri)?;
        if !upstream.is_file() {
            return Ok(None);
        }
        compute_file_checksum(&upstream).map(Some)
    }
}
