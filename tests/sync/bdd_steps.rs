//! BDD step definitions for cloning and copying documentation sources.

use std::io;

use docsync::{DocSyncer, FailurePolicy, RunError, SyncError};
use rstest_bdd_macros::{given, then, when};

use super::test_helpers::{SyncWorld, write_file};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("a documentation source \"{name}\" publishing \"{file}\"")]
fn published_source(sync_world: &SyncWorld, name: String, file: String) -> Result<(), StepError> {
    sync_world.add_published_source(&name, &file, &format!("docs/{name}"))?;
    Ok(())
}

#[given("a documentation source \"{name}\" targeting \"{local}\" with \"{file}\"")]
fn published_source_at(
    sync_world: &SyncWorld,
    name: String,
    local: String,
    file: String,
) -> Result<(), StepError> {
    sync_world.add_published_source(&name, &file, &local)?;
    Ok(())
}

#[given("a documentation source \"{name}\" whose clone fails with exit code \"{code}\"")]
fn failing_source(sync_world: &SyncWorld, name: String, code: i32) {
    sync_world.add_failing_source(&name, code);
}

#[given("a documentation source \"{name}\" without a documentation directory")]
fn source_without_docs(sync_world: &SyncWorld, name: String) -> Result<(), StepError> {
    sync_world.add_source_without_docs(&name)?;
    Ok(())
}

#[given("the working tree holds \"{path}\" with \"{contents}\"")]
fn working_tree_file(
    sync_world: &SyncWorld,
    path: String,
    contents: String,
) -> Result<(), StepError> {
    write_file(&sync_world.workdir, &path, &contents)?;
    Ok(())
}

#[given("failures do not stop the run")]
fn keep_going(sync_world: &SyncWorld) {
    sync_world.policy.set(FailurePolicy::Continue);
}

#[when("I sync the documentation sources")]
fn sync_sources(sync_world: &SyncWorld) -> Result<(), StepError> {
    let syncer = DocSyncer::new(sync_world.config(), sync_world.runner.clone())?
        .with_policy(sync_world.policy.get())
        .with_workdir(sync_world.workdir.clone());
    let sources = sync_world.sources.borrow().clone();
    let mut progress = Vec::new();

    let result = syncer.run(&sources, &mut progress);

    *sync_world.outcome.borrow_mut() = Some(result);
    Ok(())
}

#[then("the sync succeeds")]
fn sync_succeeds(sync_world: &SyncWorld) -> Result<(), StepError> {
    match *sync_world.outcome.borrow() {
        Some(Ok(ref summary)) if summary.failed.is_empty() => Ok(()),
        Some(Ok(ref summary)) => Err(StepError::Assertion(format!(
            "expected no failures, got {:?}",
            summary.failed
        ))),
        Some(Err(ref err)) => Err(StepError::Assertion(format!(
            "expected success, got failure: {err}"
        ))),
        None => Err(StepError::Assertion(String::from("missing outcome"))),
    }
}

#[then("the sync stops at source \"{position}\"")]
fn sync_stops_at(sync_world: &SyncWorld, position: usize) -> Result<(), StepError> {
    match *sync_world.outcome.borrow() {
        Some(Err(RunError::Source { position: actual, .. })) if actual == position => Ok(()),
        ref other => Err(StepError::Assertion(format!(
            "expected failure at source {position}, got {other:?}"
        ))),
    }
}

#[then("\"{failed}\" of \"{total}\" sources failed")]
fn partial_failure(sync_world: &SyncWorld, failed: usize, total: usize) -> Result<(), StepError> {
    match *sync_world.outcome.borrow() {
        Some(Err(RunError::Partial {
            total: actual_total,
            ref summary,
        })) if actual_total == total && summary.failed.len() == failed => Ok(()),
        ref other => Err(StepError::Assertion(format!(
            "expected {failed} of {total} sources to fail, got {other:?}"
        ))),
    }
}

#[then("the failure mentions \"{text}\"")]
fn failure_mentions(sync_world: &SyncWorld, text: String) -> Result<(), StepError> {
    match *sync_world.outcome.borrow() {
        Some(Err(ref err)) if err.to_string().contains(&text) => Ok(()),
        ref other => Err(StepError::Assertion(format!(
            "expected a failure mentioning {text:?}, got {other:?}"
        ))),
    }
}

#[then("the file \"{path}\" contains \"{text}\"")]
fn file_contains(sync_world: &SyncWorld, path: String, text: String) -> Result<(), StepError> {
    let contents = sync_world.read_local(&path)?;
    if contents.contains(&text) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "{path} should contain {text:?}, found {contents:?}"
        )))
    }
}

#[then("the path \"{path}\" does not exist")]
fn path_absent(sync_world: &SyncWorld, path: String) -> Result<(), StepError> {
    if sync_world.workdir.join(&path).exists() {
        return Err(StepError::Assertion(format!("{path} should not exist")));
    }
    Ok(())
}

#[then("no scratch directories remain")]
fn scratch_removed(sync_world: &SyncWorld) -> Result<(), StepError> {
    let leftover = sync_world.leftover_scratch()?;
    if leftover == 0 {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "{leftover} scratch directories left behind"
        )))
    }
}
