// src/error.rs

//! Error types for the reconciliation engine

use thiserror::Error;

/// Result type for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the reconciliation core
#[derive(Error, Debug)]
pub enum Error {
    /// Caller contract violation, e.g. mismatched name/version lists
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Package-manager list output did not have the expected shape
    #[error("malformed list output at line {line}: {reason}")]
    ParseError { line: usize, reason: String },

    /// An external command exited non-zero, timed out, or could not be spawned
    #[error("command `{command}` failed: {reason}")]
    ExecutionError { command: String, reason: String },

    /// Install or upgrade targets with no available version
    #[error("no candidate version available for: {}", .0.join(", "))]
    UnresolvableCandidate(Vec<String>),

    /// The package-manager executable could not be located
    #[error("package manager binary not found: {0}")]
    BinaryNotFound(String),

    /// The declaration file could not be parsed
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// IO error while spawning processes or reading files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build an execution error for a rendered command line
    pub fn execution(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExecutionError {
            command: command.into(),
            reason: reason.into(),
        }
    }
}
