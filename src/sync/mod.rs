//! Clone-and-copy synchronisation of documentation subtrees.
//!
//! Each source is processed in its own scratch directory: the repository is
//! cloned with the system `git` client, the documentation subtree is copied
//! into the working tree, and the scratch directory is removed whether or not
//! the earlier steps succeeded.

use std::ffi::OsString;
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use camino::{Utf8Path, Utf8PathBuf};

use crate::config::DocSyncConfig;
use crate::source::DocumentationSource;

mod copy;
mod error;
mod plan;
mod scratch;
mod summary;
mod types;

pub use copy::copy_tree;
pub use error::SyncError;
pub use scratch::{SCRATCH_PREFIX, ScratchSpace};
pub use summary::{FailurePolicy, RunError, SourceFailure, SyncSummary};
pub use types::{CommandOutput, CommandRunner, ProcessCommandRunner, StreamingCommandRunner};

/// Prefix written before every progress line.
pub const PROGRESS_MARKER: &str = "🔨";

/// Runs the clone-and-copy pipeline for an ordered list of sources.
#[derive(Clone, Debug)]
pub struct DocSyncer<R: CommandRunner> {
    config: DocSyncConfig,
    runner: R,
    policy: FailurePolicy,
    workdir: Option<Utf8PathBuf>,
    interrupted: Option<Arc<AtomicBool>>,
}

impl DocSyncer<ProcessCommandRunner> {
    /// Convenience constructor that wires the real process runner.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidConfig`] when validation fails.
    pub fn with_process_runner(config: DocSyncConfig) -> Result<Self, SyncError> {
        Self::new(config, ProcessCommandRunner)
    }
}

impl<R: CommandRunner> DocSyncer<R> {
    /// Creates a new syncer using the provided runner and configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidConfig`] when configuration validation
    /// fails.
    pub fn new(config: DocSyncConfig, runner: R) -> Result<Self, SyncError> {
        config.validate()?;
        Ok(Self {
            config,
            runner,
            policy: FailurePolicy::default(),
            workdir: None,
            interrupted: None,
        })
    }

    /// Sets the policy applied when a source fails.
    #[must_use]
    pub const fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolves local destinations against `workdir` instead of the process
    /// working directory.
    #[must_use]
    pub fn with_workdir(mut self, workdir: impl Into<Utf8PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    /// Observes `flag` between steps; once it is set the run stops with an
    /// interrupted error and the current scratch directory is removed.
    #[must_use]
    pub fn with_interrupt_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupted = Some(flag);
        self
    }

    /// Returns a reference to the underlying configuration.
    #[must_use]
    pub const fn config(&self) -> &DocSyncConfig {
        &self.config
    }

    /// Returns the policy applied when a source fails.
    #[must_use]
    pub const fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Processes `sources` in order, writing progress lines to `progress`.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`], returns [`RunError::Source`] for the
    /// first failing source. Under [`FailurePolicy::Continue`], returns
    /// [`RunError::Partial`] after all sources were attempted if any failed.
    /// An interrupt always ends the run with [`RunError::Interrupted`].
    pub fn run<W: Write>(
        &self,
        sources: &[DocumentationSource],
        progress: &mut W,
    ) -> Result<SyncSummary, RunError> {
        let mut summary = SyncSummary::default();

        for (index, source) in sources.iter().enumerate() {
            report(progress, format_args!("Loading docs from: {source}"));
            match self.sync_source(source, progress) {
                Ok(files) => {
                    report(
                        progress,
                        format_args!("Copied {files} files into {}", source.local_docs_path),
                    );
                    summary.files_copied += files;
                    summary.synced.push(source.clone());
                }
                Err(SyncError::Interrupted) => {
                    return Err(RunError::Interrupted {
                        address: source.repo_address.clone(),
                    });
                }
                Err(err) => match self.policy {
                    FailurePolicy::Abort => {
                        return Err(RunError::Source {
                            position: index + 1,
                            address: source.repo_address.clone(),
                            source: err,
                        });
                    }
                    FailurePolicy::Continue => {
                        report(progress, format_args!("Skipping {source}: {err}"));
                        summary.failed.push(SourceFailure {
                            source: source.clone(),
                            error: err,
                        });
                    }
                },
            }
        }

        if summary.failed.is_empty() {
            Ok(summary)
        } else {
            Err(RunError::Partial {
                total: sources.len(),
                summary,
            })
        }
    }

    /// Clones one source into a fresh scratch directory and copies its
    /// documentation subtree into place. Returns the number of files copied.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidSource`] for a malformed descriptor,
    /// [`SyncError::Spawn`] or [`SyncError::CloneFailed`] when cloning fails,
    /// [`SyncError::MissingDocs`] or [`SyncError::Copy`] when copying fails,
    /// [`SyncError::Scratch`] when the scratch directory cannot be managed,
    /// and [`SyncError::Interrupted`] when the interrupt flag was raised.
    pub fn sync_source<W: Write>(
        &self,
        source: &DocumentationSource,
        progress: &mut W,
    ) -> Result<usize, SyncError> {
        source.validate()?;
        self.check_interrupt()?;

        let scratch_parent = self.config.scratch_dir();
        let scratch = ScratchSpace::acquire(scratch_parent.as_deref())?;

        report(
            progress,
            format_args!(
                "Cloning from {} into {}",
                source.repo_address,
                scratch.path()
            ),
        );
        // A clone killed by the terminal's SIGINT exits without a status, so
        // the interrupt flag takes precedence over the clone result.
        let cloned = self.clone_repository(&source.repo_address, scratch.path());
        self.check_interrupt()?;
        cloned?;

        let docs = scratch.path().join(&source.repo_docs_path);
        let target = self.local_path(&source.local_docs_path);
        report(
            progress,
            format_args!("Copying docs from {docs} to {target}"),
        );
        let copied = copy_tree(&docs, &target)?;

        scratch.release()?;
        Ok(copied)
    }

    /// Clones `address` into `destination` and checks the client's exit
    /// status.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Spawn`] when the client cannot be started and
    /// [`SyncError::CloneFailed`] when it exits unsuccessfully.
    pub fn clone_repository(&self, address: &str, destination: &Utf8Path) -> Result<(), SyncError> {
        let args = Self::build_clone_args(address, destination);
        let output = self.runner.run(&self.config.git_bin, &args)?;
        if output.is_success() {
            return Ok(());
        }

        Err(SyncError::CloneFailed {
            address: address.to_owned(),
            status: output.code,
            status_text: output.status_text(),
            stderr: output.stderr.trim().to_owned(),
        })
    }

    /// Resolves a source's local destination against the configured working
    /// directory.
    #[must_use]
    pub fn local_path(&self, local_docs_path: &Utf8Path) -> Utf8PathBuf {
        self.workdir.as_ref().map_or_else(
            || local_docs_path.to_path_buf(),
            |root| root.join(local_docs_path),
        )
    }

    fn build_clone_args(address: &str, destination: &Utf8Path) -> Vec<OsString> {
        vec![
            OsString::from("clone"),
            OsString::from("--"),
            OsString::from(address),
            OsString::from(destination.as_str()),
        ]
    }

    fn check_interrupt(&self) -> Result<(), SyncError> {
        match self.interrupted {
            Some(ref flag) if flag.load(Ordering::SeqCst) => Err(SyncError::Interrupted),
            _ => Ok(()),
        }
    }
}

/// Writes one progress line; failures on the diagnostic stream are ignored.
fn report<W: Write>(progress: &mut W, message: fmt::Arguments<'_>) {
    writeln!(progress, "{PROGRESS_MARKER} {message}").ok();
}

#[cfg(test)]
mod tests;
