//! Temporary, re-owned copies of files
//!
//! When pip runs as another user that user usually cannot read the original
//! requirements file. [`ScopedCopy`] duplicates the file to a fresh temporary
//! path, hands ownership to the target user and removes the copy when
//! dropped, whatever happened in between.

use std::fs;
use std::path::Path;

use tempfile::TempPath;
use tracing::{debug, warn};

use crate::ownership::Ownership;
use crate::{Error, Result};

/// A temporary copy of a file owned by another user.
///
/// The copy is removed on drop. Names are generated per call so concurrent
/// invocations never collide.
#[derive(Debug)]
pub struct ScopedCopy {
    path: Option<TempPath>,
}

impl ScopedCopy {
    /// Copy `source` to a new temporary file and change its owner to `user`.
    ///
    /// If the ownership change fails the copy is removed before the error is
    /// returned.
    pub fn create(source: &Path, user: &str, ownership: &dyn Ownership) -> Result<Self> {
        Self::create_in(&std::env::temp_dir(), source, user, ownership)
    }

    /// Like [`ScopedCopy::create`], placing the copy inside `dir`.
    pub fn create_in(
        dir: &Path,
        source: &Path,
        user: &str,
        ownership: &dyn Ownership,
    ) -> Result<Self> {
        let temp = tempfile::Builder::new()
            .prefix("pipctl-req-")
            .suffix(".txt")
            .tempfile_in(dir)
            .map_err(|e| Error::io(dir, e))?;
        let scoped = Self {
            path: Some(temp.into_temp_path()),
        };

        fs::copy(source, scoped.path()).map_err(|e| Error::io(source, e))?;
        debug!(
            source = %source.display(),
            copy = %scoped.path().display(),
            user,
            "changing ownership of requirements copy"
        );
        ownership.chown(scoped.path(), user)?;

        Ok(scoped)
    }

    /// Location of the temporary copy.
    pub fn path(&self) -> &Path {
        match &self.path {
            Some(path) => &**path,
            None => Path::new(""),
        }
    }
}

impl Drop for ScopedCopy {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            let shown = path.display().to_string();
            if let Err(e) = path.close() {
                warn!(path = %shown, error = %e, "failed to remove temporary requirements copy");
            }
        }
    }
}
