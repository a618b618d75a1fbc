//! Error types for pipctl-core

use std::path::PathBuf;

/// Result type for pipctl-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while preparing or running pip.
///
/// A missing remote requirements file during install is not an error; see
/// [`crate::InstallOutcome::RequirementsNotFound`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// pip or the virtualenv activation script could not be located.
    #[error("Could not find a `{binary}` binary (searched: {searched})")]
    BinaryNotFound { binary: String, searched: String },

    /// A request option is malformed or conflicts with another option.
    #[error("Invalid {field} '{value}': {reason}")]
    Validation {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// The log path cannot be written or checked.
    #[error("'{}' is not writeable: {message}", .path.display())]
    IoAccess { path: PathBuf, message: String },

    /// pip exited non-zero where no partial result is meaningful.
    #[error("Command `{command}` failed (exit code {code}): {stderr}")]
    Execution {
        command: String,
        code: i32,
        stderr: String,
    },

    /// The process could not be started at all.
    #[error("Failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Running as another user is not possible on this platform.
    #[error("Running pip as user '{user}' is not supported on this platform")]
    RunAsUnsupported { user: String },

    /// A requirements file needed for uninstall could not be obtained.
    #[error("pip requirements file '{source_spec}' not found")]
    RequirementsNotFound { source_spec: String },

    #[error("Failed to load config at {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Fs(#[from] pipctl_fs::Error),
}

impl Error {
    pub(crate) fn validation(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_names_field_and_value() {
        let err = Error::validation("timeout", "abc", "not a valid base 10 integer");
        let msg = err.to_string();
        assert!(msg.contains("timeout"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_execution_carries_stderr() {
        let err = Error::Execution {
            command: "pip freeze".to_string(),
            code: 2,
            stderr: "No module named pip".to_string(),
        };
        assert!(err.to_string().contains("No module named pip"));
    }
}
