//! Ownership changes for files handed to another user

use std::path::Path;

use tracing::debug;

use crate::Result;

/// Change the owner of a file.
pub trait Ownership: Send + Sync {
    fn chown(&self, path: &Path, user: &str) -> Result<()>;
}

/// [`Ownership`] implementation backed by the host's `chown` utility.
///
/// On Windows there is no equivalent, so ownership is left untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOwnership;

impl Ownership for SystemOwnership {
    #[cfg(not(windows))]
    fn chown(&self, path: &Path, user: &str) -> Result<()> {
        use crate::Error;
        use std::process::Command;

        debug!(path = %path.display(), user, "changing file owner");

        let output = Command::new("chown")
            .arg(user)
            .arg(path)
            .output()
            .map_err(|e| Error::ChownFailed {
                path: path.to_path_buf(),
                user: user.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::ChownFailed {
                path: path.to_path_buf(),
                user: user.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    #[cfg(windows)]
    fn chown(&self, path: &Path, user: &str) -> Result<()> {
        debug!(path = %path.display(), user, "ownership changes are not supported on Windows");
        Ok(())
    }
}
