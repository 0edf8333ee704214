//! Scoped scratch directories for repository clones.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::{Builder, TempDir};

use super::SyncError;

/// Prefix applied to every scratch directory name.
pub const SCRATCH_PREFIX: &str = "docsync-";

/// Uniquely named temporary directory that is deleted, contents included,
/// when dropped.
#[derive(Debug)]
pub struct ScratchSpace {
    dir: TempDir,
    path: Utf8PathBuf,
}

impl ScratchSpace {
    /// Creates a scratch directory under `parent`, or under the system
    /// temporary directory when `parent` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Scratch`] when the directory cannot be created or
    /// its path is not valid UTF-8.
    pub fn acquire(parent: Option<&Utf8Path>) -> Result<Self, SyncError> {
        let mut builder = Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        let created = match parent {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };
        let dir = created.map_err(|err| SyncError::Scratch {
            message: err.to_string(),
        })?;
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).map_err(|non_utf8| {
            SyncError::Scratch {
                message: format!("path is not valid UTF-8: {}", non_utf8.display()),
            }
        })?;

        Ok(Self { dir, path })
    }

    /// Location of the scratch directory.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Deletes the directory now, surfacing removal errors that a plain drop
    /// would swallow.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Scratch`] when the tree cannot be removed.
    pub fn release(self) -> Result<(), SyncError> {
        self.dir.close().map_err(|err| SyncError::Scratch {
            message: format!("failed to remove {}: {err}", self.path),
        })
    }
}
