//! Requirements file acquisition
//!
//! A requirements source is either a local path, used as-is, or a
//! `salt://` URI resolved through a [`FileCache`]. Cached copies are
//! invalidated by content hash, not by modification time.

use std::fmt;
use std::path::{Path, PathBuf};

use pipctl_fs::{FileCache, REMOTE_SCHEME};
use tracing::{debug, info};

use crate::error::Result;

/// Where a requirements file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementsSource {
    Local(PathBuf),
    Remote(String),
}

impl RequirementsSource {
    /// Classify a requirements specification by its scheme.
    pub fn parse(spec: &str) -> Self {
        if spec.starts_with(REMOTE_SCHEME) {
            Self::Remote(spec.to_string())
        } else {
            Self::Local(PathBuf::from(spec))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl From<&str> for RequirementsSource {
    fn from(spec: &str) -> Self {
        Self::parse(spec)
    }
}

impl From<PathBuf> for RequirementsSource {
    fn from(path: PathBuf) -> Self {
        match path.to_str() {
            Some(spec) if spec.starts_with(REMOTE_SCHEME) => Self::Remote(spec.to_string()),
            _ => Self::Local(path),
        }
    }
}

impl fmt::Display for RequirementsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(uri) => f.write_str(uri),
        }
    }
}

/// Resolves a [`RequirementsSource`] to a local, up-to-date file.
pub struct RequirementsAcquirer<'a> {
    cache: &'a dyn FileCache,
}

impl<'a> RequirementsAcquirer<'a> {
    pub fn new(cache: &'a dyn FileCache) -> Self {
        Self { cache }
    }

    /// Local path for `source`, or `None` when a remote file cannot be
    /// obtained.
    pub fn acquire(&self, source: &RequirementsSource) -> Result<Option<PathBuf>> {
        match source {
            RequirementsSource::Local(path) => Ok(Some(path.clone())),
            RequirementsSource::Remote(uri) => self.acquire_remote(uri),
        }
    }

    fn acquire_remote(&self, uri: &str) -> Result<Option<PathBuf>> {
        let cached = match self.cache.is_cached(uri)? {
            Some(path) => Some(path),
            None => self.cache.cache_file(uri)?,
        };
        let Some(cached) = cached else {
            debug!(uri, "requirements file could not be cached");
            return Ok(None);
        };

        if self.is_stale(uri, &cached)? {
            info!(uri, "upstream requirements changed, fetching again");
            return Ok(self.cache.cache_file(uri)?);
        }
        Ok(Some(cached))
    }

    fn is_stale(&self, uri: &str, cached: &Path) -> Result<bool> {
        let remote = self.cache.hash_remote(uri)?;
        let local = self.cache.hash_local(cached)?;
        Ok(remote.as_deref() != Some(local.as_str()))
    }
}
