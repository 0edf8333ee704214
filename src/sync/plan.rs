//! Dry-run rendering of the steps a run would perform.

use shell_escape::unix::escape;

use crate::source::DocumentationSource;

use super::{CommandRunner, DocSyncer};

/// Placeholder standing in for the scratch directory, which only exists
/// during a real run.
pub const SCRATCH_PLACEHOLDER: &str = "<scratch>";

impl<R: CommandRunner> DocSyncer<R> {
    /// Describes, one line per step, what [`DocSyncer::run`] would do for
    /// `sources` without spawning processes or touching the filesystem.
    ///
    /// Clone commands are shell-escaped so they can be pasted into a shell
    /// once the placeholder is replaced.
    #[must_use]
    pub fn plan(&self, sources: &[DocumentationSource]) -> Vec<String> {
        let mut lines = Vec::with_capacity(sources.len() * 2);
        for (index, source) in sources.iter().enumerate() {
            let position = index + 1;
            let git = escape(self.config().git_bin.as_str().into());
            let address = escape(source.repo_address.as_str().into());
            lines.push(format!(
                "[{position}] {git} clone -- {address} {SCRATCH_PLACEHOLDER}"
            ));
            lines.push(format!(
                "[{position}] copy {SCRATCH_PLACEHOLDER}/{} -> {}",
                source.repo_docs_path,
                self.local_path(&source.local_docs_path)
            ));
        }
        lines
    }
}
