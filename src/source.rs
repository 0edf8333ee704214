//! Documentation source descriptors.
//!
//! A source names a remote repository, the documentation subtree inside it,
//! and the local directory that receives a copy of that subtree.

use std::fmt;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;

/// Repository fetched when no manifest is present.
pub const DEFAULT_REPO_ADDRESS: &str = "git@github.com:Mazurel/Modbus.git";

/// Documentation subtree copied from [`DEFAULT_REPO_ADDRESS`].
pub const DEFAULT_REPO_DOCS_PATH: &str = "docs/html/";

/// Local destination for the default documentation subtree.
pub const DEFAULT_LOCAL_DOCS_PATH: &str = "docs/modbus/";

/// Immutable description of one documentation subtree to fetch.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DocumentationSource {
    /// Address understood by the version-control client (URL, SSH spec, or
    /// local path).
    pub repo_address: String,
    /// Path to the documentation subtree, relative to the repository root.
    pub repo_docs_path: Utf8PathBuf,
    /// Destination directory, relative to the working directory.
    pub local_docs_path: Utf8PathBuf,
}

/// Reasons a [`DocumentationSource`] is rejected.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SourceError {
    /// Raised when the repository address is empty or whitespace.
    #[error("repo_address must not be blank")]
    BlankAddress,
    /// Raised when a path field is empty.
    #[error("{field} must not be empty")]
    EmptyPath {
        /// Name of the offending field.
        field: String,
    },
    /// Raised when a path field is absolute.
    #[error("{field} must be a relative path, got {path}")]
    AbsolutePath {
        /// Name of the offending field.
        field: String,
        /// Rejected value.
        path: Utf8PathBuf,
    },
    /// Raised when a path field climbs out of its root with `..`.
    #[error("{field} must not contain '..' components, got {path}")]
    EscapingPath {
        /// Name of the offending field.
        field: String,
        /// Rejected value.
        path: Utf8PathBuf,
    },
}

impl DocumentationSource {
    /// Builds a source descriptor.
    #[must_use]
    pub fn new(
        repo_address: impl Into<String>,
        repo_docs_path: impl Into<Utf8PathBuf>,
        local_docs_path: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            repo_address: repo_address.into(),
            repo_docs_path: repo_docs_path.into(),
            local_docs_path: local_docs_path.into(),
        }
    }

    /// Checks that the address is present and both paths stay inside their
    /// respective roots.
    ///
    /// # Errors
    ///
    /// Returns the first [`SourceError`] found.
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.repo_address.trim().is_empty() {
            return Err(SourceError::BlankAddress);
        }
        require_contained_path(&self.repo_docs_path, "repo_docs_path")?;
        require_contained_path(&self.local_docs_path, "local_docs_path")
    }
}

impl fmt::Display for DocumentationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} -> {})",
            self.repo_address, self.repo_docs_path, self.local_docs_path
        )
    }
}

/// Returns the built-in source table used when no manifest exists.
#[must_use]
pub fn default_sources() -> Vec<DocumentationSource> {
    vec![DocumentationSource::new(
        DEFAULT_REPO_ADDRESS,
        DEFAULT_REPO_DOCS_PATH,
        DEFAULT_LOCAL_DOCS_PATH,
    )]
}

fn require_contained_path(path: &Utf8Path, field: &str) -> Result<(), SourceError> {
    if path.as_str().trim().is_empty() {
        return Err(SourceError::EmptyPath {
            field: field.to_owned(),
        });
    }
    if path.is_absolute() || path.has_root() {
        return Err(SourceError::AbsolutePath {
            field: field.to_owned(),
            path: path.to_path_buf(),
        });
    }
    if path
        .components()
        .any(|component| matches!(component, Utf8Component::ParentDir))
    {
        return Err(SourceError::EscapingPath {
            field: field.to_owned(),
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
