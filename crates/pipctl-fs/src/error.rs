//! Error types for pipctl-fs

use std::path::PathBuf;

/// Result type for pipctl-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pipctl-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {}", .path.display())]
    LockFailed { path: PathBuf },

    #[error("Invalid cache URI '{uri}': {reason}")]
    InvalidCacheUri { uri: String, reason: String },

    #[error("Failed to change owner of {} to '{user}': {message}", .path.display())]
    ChownFailed {
        path: PathBuf,
        user: String,
        message: String,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = Error::io(
            "/srv/cache/reqs.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/srv/cache/reqs.txt"));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_chown_error_display() {
        let err = Error::ChownFailed {
            path: PathBuf::from("/tmp/pip-req-1.txt"),
            user: "deploy".to_string(),
            message: "invalid user".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("deploy"));
        assert!(msg.contains("invalid user"));
    }
}
