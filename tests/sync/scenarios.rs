//! BDD scenarios for documentation sync.

use rstest_bdd_macros::scenario;

use super::test_helpers::{SyncWorld, sync_world};

#[scenario(
    path = "tests/features/sync.feature",
    name = "Fetch documentation into an empty working tree"
)]
fn scenario_fetch_into_empty_tree(sync_world: SyncWorld) {
    drop(sync_world);
}

#[scenario(
    path = "tests/features/sync.feature",
    name = "Overwrite stale files and keep unrelated ones"
)]
fn scenario_overwrite_and_keep(sync_world: SyncWorld) {
    drop(sync_world);
}

#[scenario(
    path = "tests/features/sync.feature",
    name = "Stop at the first failing clone"
)]
fn scenario_abort_on_clone_failure(sync_world: SyncWorld) {
    drop(sync_world);
}

#[scenario(
    path = "tests/features/sync.feature",
    name = "Keep going past a failing clone"
)]
fn scenario_continue_after_clone_failure(sync_world: SyncWorld) {
    drop(sync_world);
}

#[scenario(
    path = "tests/features/sync.feature",
    name = "Report a missing documentation directory"
)]
fn scenario_missing_docs(sync_world: SyncWorld) {
    drop(sync_world);
}

#[scenario(
    path = "tests/features/sync.feature",
    name = "Later sources overwrite earlier ones at the same destination"
)]
fn scenario_shared_destination(sync_world: SyncWorld) {
    drop(sync_world);
}
