//! Shared world fixture for documentation sync scenarios.

use std::cell::{Cell, RefCell};
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use docsync::test_support::ScriptedRunner;
use docsync::{DocSyncConfig, DocumentationSource, FailurePolicy, RunError, SyncSummary};
use rstest::fixture;
use tempfile::TempDir;

/// Outcome of the most recent run, if any.
pub type Outcome = Option<Result<SyncSummary, RunError>>;

/// Scenario state: a temporary working tree, fake upstream repositories, and
/// the scripted clone responses queued for each source.
pub struct SyncWorld {
    pub workdir: Utf8PathBuf,
    pub scratch_parent: Utf8PathBuf,
    pub upstream: Utf8PathBuf,
    pub runner: ScriptedRunner,
    pub sources: RefCell<Vec<DocumentationSource>>,
    pub policy: Cell<FailurePolicy>,
    pub outcome: RefCell<Outcome>,
    _tmp: TempDir,
}

impl SyncWorld {
    fn new() -> io::Result<Self> {
        let tmp = TempDir::new()?;
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf())
            .map_err(|path| io::Error::other(format!("non UTF-8 temp path {}", path.display())))?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())?;
        for name in ["work", "scratch", "upstream"] {
            dir.create_dir(name)?;
        }

        Ok(Self {
            workdir: root.join("work"),
            scratch_parent: root.join("scratch"),
            upstream: root.join("upstream"),
            runner: ScriptedRunner::new(),
            sources: RefCell::new(Vec::new()),
            policy: Cell::new(FailurePolicy::Abort),
            outcome: RefCell::new(None),
            _tmp: tmp,
        })
    }

    pub fn config(&self) -> DocSyncConfig {
        DocSyncConfig {
            scratch_parent: Some(self.scratch_parent.to_string()),
            ..DocSyncConfig::default()
        }
    }

    /// Creates an upstream repository named `name` whose `docs/html/` holds
    /// `file`, queues a clone of it, and registers a source targeting `local`.
    pub fn add_published_source(&self, name: &str, file: &str, local: &str) -> io::Result<()> {
        let repo = self.upstream.join(name);
        write_file(
            &repo,
            &format!("docs/html/{file}"),
            &format!("upstream {name} {file}"),
        )?;
        self.runner.push_clone_from(repo);
        self.push_source(name, local);
        Ok(())
    }

    /// Creates an upstream repository without a documentation directory.
    pub fn add_source_without_docs(&self, name: &str) -> io::Result<()> {
        let repo = self.upstream.join(name);
        write_file(&repo, "README.md", "no docs here")?;
        self.runner.push_clone_from(repo);
        self.push_source(name, &format!("docs/{name}"));
        Ok(())
    }

    /// Registers a source whose clone exits with `code`.
    pub fn add_failing_source(&self, name: &str, code: i32) {
        self.runner.push_failure(code);
        self.push_source(name, &format!("docs/{name}"));
    }

    pub fn leftover_scratch(&self) -> io::Result<usize> {
        let dir = Dir::open_ambient_dir(&self.scratch_parent, ambient_authority())?;
        Ok(dir.entries()?.count())
    }

    pub fn read_local(&self, relative: &str) -> io::Result<String> {
        Dir::open_ambient_dir(&self.workdir, ambient_authority())?.read_to_string(relative)
    }

    fn push_source(&self, name: &str, local: &str) {
        self.sources.borrow_mut().push(DocumentationSource::new(
            format!("git@example.com:{name}.git"),
            "docs/html/",
            local,
        ));
    }
}

pub fn write_file(root: &Utf8Path, relative: &str, contents: &str) -> io::Result<()> {
    Dir::create_ambient_dir_all(root, ambient_authority())?;
    let dir = Dir::open_ambient_dir(root, ambient_authority())?;
    if let Some(parent) = Utf8Path::new(relative)
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
    {
        dir.create_dir_all(parent)?;
    }
    dir.write(relative, contents)
}

#[fixture]
pub fn sync_world() -> SyncWorld {
    SyncWorld::new().unwrap_or_else(|err| panic!("sync world fixture should initialise: {err}"))
}
