//! Error types for pipctl-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] pipctl_core::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// pip ran but reported failure.
    #[error("pip exited with code {code}")]
    PipFailed { code: i32 },

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    ///
    /// pip's own exit code is passed through; everything else exits 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::PipFailed { code } if *code > 0 => *code,
            _ => 1,
        }
    }
}
