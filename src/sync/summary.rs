//! Batch outcomes and the policy applied when a source fails.

use thiserror::Error;

use crate::source::DocumentationSource;

use super::SyncError;

/// What the runner does after a source fails.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FailurePolicy {
    /// Stop at the first failing source; later sources are not processed.
    #[default]
    Abort,
    /// Record the failure and carry on with the next source.
    Continue,
}

/// A source that could not be synchronised, with the reason.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceFailure {
    /// Source that failed.
    pub source: DocumentationSource,
    /// Error raised while processing it.
    pub error: SyncError,
}

/// Result of a batch run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SyncSummary {
    /// Sources copied successfully, in processing order.
    pub synced: Vec<DocumentationSource>,
    /// Failures recorded under [`FailurePolicy::Continue`].
    pub failed: Vec<SourceFailure>,
    /// Total number of files written across all sources.
    pub files_copied: usize,
}

/// Errors that end a batch run.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum RunError {
    /// Raised under [`FailurePolicy::Abort`] when a source fails.
    #[error("source #{position} ({address}) failed: {source}")]
    Source {
        /// One-based position of the failing source.
        position: usize,
        /// Repository address of the failing source.
        address: String,
        /// Underlying failure.
        #[source]
        source: SyncError,
    },
    /// Raised under [`FailurePolicy::Continue`] when at least one source
    /// failed.
    #[error("{} of {total} documentation sources failed", summary.failed.len())]
    Partial {
        /// Number of sources attempted.
        total: usize,
        /// Per-source outcomes.
        summary: SyncSummary,
    },
    /// Raised when the run is interrupted; remaining sources are skipped.
    #[error("interrupted while syncing {address}")]
    Interrupted {
        /// Repository address being processed when the interrupt arrived.
        address: String,
    },
}
