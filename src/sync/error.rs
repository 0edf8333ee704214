//! Error types for cloning and copying documentation sources.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::source::SourceError;

/// Errors surfaced while synchronising a single documentation source.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SyncError {
    /// Raised when configuration is missing required values. The error message
    /// includes guidance on how to provide the value via environment variable
    /// or configuration file.
    #[error("missing {field}: set DOCSYNC_{env_suffix} or add {field} to .docsync.toml", env_suffix = field.to_uppercase())]
    InvalidConfig {
        /// Configuration field that failed validation.
        field: String,
    },
    /// Raised when a source descriptor fails validation.
    #[error("invalid source: {0}")]
    InvalidSource(#[from] SourceError),
    /// Raised when a command cannot be spawned.
    #[error("failed to spawn {program}: {message}")]
    Spawn {
        /// Command that failed to start.
        program: String,
        /// Operating system error string.
        message: String,
    },
    /// Raised when the clone subprocess completes unsuccessfully.
    #[error(
        "cloning {address} failed with status {status_text}{}",
        stderr_suffix(.stderr)
    )]
    CloneFailed {
        /// Repository address passed to the version-control client.
        address: String,
        /// Exit status as reported by the OS.
        status: Option<i32>,
        /// Human readable representation of the exit status.
        status_text: String,
        /// Stderr captured from the process.
        stderr: String,
    },
    /// Raised when the documentation subtree is absent from the clone.
    #[error("documentation directory missing from clone: {path}")]
    MissingDocs {
        /// Path inside the repository that was expected to exist.
        path: Utf8PathBuf,
    },
    /// Raised when copying the subtree fails part way through.
    #[error("failed to copy {path}: {message}")]
    Copy {
        /// Path that could not be read or written.
        path: Utf8PathBuf,
        /// Operating system error string.
        message: String,
    },
    /// Raised when the scratch directory cannot be created.
    #[error("failed to create scratch directory: {message}")]
    Scratch {
        /// Operating system error string.
        message: String,
    },
    /// Raised when the run is interrupted before a source completes.
    #[error("interrupted")]
    Interrupted,
}

/// Renders captured stderr as `: <text>`, or nothing when git printed nothing.
fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}
