//! Error types for dep-switch.
//!
//! All operations return `Result<T>` which aliases `Result<T, SwitchError>`.

use thiserror::Error;

/// Errors from switch operations.
#[derive(Debug, Error)]
pub enum SwitchError {
    /// Querying the remote repository failed or produced unexpected output.
    #[error("Remote resolution failed: {0}")]
    RemoteResolution(String),

    /// No family with this name is configured.
    #[error("Unknown dependency family '{0}'")]
    UnknownFamily(String),

    /// The family cannot be switched to the requested mode.
    #[error("Family '{family}' does not support {mode} mode")]
    UnsupportedMode { family: String, mode: String },

    /// Invalid configuration file.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Rollback failed after a write error.
    #[error("Rollback failed: {0}")]
    RollbackFailed(String),

    /// File system operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML parse error in the configuration file.
    #[error("TOML error: {0}")]
    Toml(#[from] toml_edit::TomlError),

    /// Regex compilation failed (indicates bug).
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Unexpected error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for dep-switch operations.
pub type Result<T> = std::result::Result<T, SwitchError>;
