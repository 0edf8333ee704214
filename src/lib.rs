//! Core library for the docsync documentation fetcher.
//!
//! The crate clones each configured git repository into a scratch directory,
//! copies one documentation subtree from the clone into the local working
//! tree, and removes the scratch directory afterwards. Sources come from a
//! TOML manifest or from the built-in table when no manifest exists.

pub mod config;
pub mod manifest;
pub mod source;
pub mod sync;
pub mod test_support;

pub use config::{ConfigError, DocSyncConfig};
pub use manifest::{DEFAULT_MANIFEST_PATH, ManifestError, SourceManifest};
pub use source::{DocumentationSource, SourceError, default_sources};
pub use sync::{
    CommandOutput, CommandRunner, DocSyncer, FailurePolicy, ProcessCommandRunner, RunError,
    SourceFailure, StreamingCommandRunner, SyncError, SyncSummary, copy_tree,
};
