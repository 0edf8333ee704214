//! Command-line interface definitions for the `docsync` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::Parser;

/// Top-level CLI for the `docsync` binary.
#[derive(Debug, Parser)]
#[command(
    name = "docsync",
    about = "Fetch documentation subtrees from git repositories into the working tree",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Clone each configured repository and copy its documentation into place.
    #[command(
        name = "sync",
        about = "Clone each source and copy its documentation into place"
    )]
    Sync(SyncCommand),
    /// Print the configured sources in processing order.
    #[command(name = "list", about = "Print the configured sources in processing order")]
    List(ListCommand),
}

/// Arguments for the `docsync sync` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct SyncCommand {
    /// Read sources from this manifest instead of the configured one.
    ///
    /// When the manifest does not exist the built-in source table is used.
    #[arg(long, value_name = "PATH")]
    pub(crate) manifest: Option<String>,
    /// Use this `git` executable for cloning.
    #[arg(long, value_name = "PATH")]
    pub(crate) git_bin: Option<String>,
    /// Keep processing later sources after one fails, then report every
    /// failure.
    #[arg(long)]
    pub(crate) keep_going: bool,
    /// Print the clone and copy steps without running them.
    #[arg(long)]
    pub(crate) dry_run: bool,
}

/// Arguments for the `docsync list` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct ListCommand {
    /// Read sources from this manifest instead of the configured one.
    #[arg(long, value_name = "PATH")]
    pub(crate) manifest: Option<String>,
}
