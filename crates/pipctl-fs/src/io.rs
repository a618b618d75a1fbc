//! Atomic I/O operations with file locking

use fs2::FileExt;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::{Error, Result};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so that concurrent readers of a cached
/// requirements file never observe a partial write.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp = match path.parent() {
        Some(parent) => tempfile::Builder::new()
            .prefix(".pipctl-")
            .suffix(".tmp")
            .tempfile_in(parent),
        None => tempfile::Builder::new()
            .prefix(".pipctl-")
            .suffix(".tmp")
            .tempfile(),
    }
    .map_err(|e| Error::io(path, e))?;

    let mut file = temp.as_file();
    file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    file.write_all(content)
        .map_err(|e| Error::io(temp.path(), e))?;
    file.sync_all().map_err(|e| Error::io(temp.path(), e))?;

    file.unlock().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    temp.persist(path).map_err(|e| Error::io(path, e.error))?;

    Ok(())
}

/// Copy a file atomically, reading the source fully before writing.
pub fn copy_atomic(from: &Path, to: &Path) -> Result<()> {
    let content = fs::read(from).map_err(|e| Error::io(from, e))?;
    write_atomic(to, &content)
}
