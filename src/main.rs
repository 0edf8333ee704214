//! Binary entry point for the docsync CLI.

use std::io::{self, Write};
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use thiserror::Error;

use docsync::{
    DocSyncConfig, DocSyncer, DocumentationSource, FailurePolicy, ManifestError, RunError,
    SourceManifest, StreamingCommandRunner, SyncError,
};

mod cli;

use cli::{Cli, ListCommand, SyncCommand};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),
    #[error("{0}")]
    Run(#[from] RunError),
    #[error("failed to install interrupt handler: {0}")]
    Interrupt(String),
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match dispatch(&cli) {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn dispatch(cli: &Cli) -> Result<(), CliError> {
    match cli {
        Cli::Sync(command) => sync_command(command),
        Cli::List(command) => list_command(command),
    }
}

fn sync_command(args: &SyncCommand) -> Result<(), CliError> {
    let loaded =
        DocSyncConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    let config = apply_overrides(loaded, args.manifest.as_deref(), args.git_bin.as_deref());
    config.validate()?;
    let sources = SourceManifest::load_or_builtin(&config.manifest())?.into_sources();

    let syncer = DocSyncer::new(config, StreamingCommandRunner)?.with_policy(policy_for(args));

    if args.dry_run {
        let mut stdout = io::stdout();
        for line in syncer.plan(&sources) {
            writeln!(stdout, "{line}").ok();
        }
        return Ok(());
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    install_interrupt_handler(&interrupted)?;
    let summary = syncer
        .with_interrupt_flag(interrupted)
        .run(&sources, &mut io::stderr())?;

    writeln!(
        io::stderr(),
        "synced {} source(s), {} file(s) copied",
        summary.synced.len(),
        summary.files_copied
    )
    .ok();
    Ok(())
}

fn list_command(args: &ListCommand) -> Result<(), CliError> {
    let loaded =
        DocSyncConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    let config = apply_overrides(loaded, args.manifest.as_deref(), None);
    config.validate()?;
    let manifest = SourceManifest::load_or_builtin(&config.manifest())?;

    write_sources(io::stdout(), &manifest.sources);
    Ok(())
}

fn apply_overrides(
    config: DocSyncConfig,
    manifest: Option<&str>,
    git_bin: Option<&str>,
) -> DocSyncConfig {
    DocSyncConfig {
        manifest_path: manifest.map_or(config.manifest_path, str::to_owned),
        git_bin: git_bin.map_or(config.git_bin, str::to_owned),
        scratch_parent: config.scratch_parent,
    }
}

const fn policy_for(args: &SyncCommand) -> FailurePolicy {
    if args.keep_going {
        FailurePolicy::Continue
    } else {
        FailurePolicy::Abort
    }
}

fn install_interrupt_handler(flag: &Arc<AtomicBool>) -> Result<(), CliError> {
    let handler_flag = Arc::clone(flag);
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    })
    .map_err(|err| CliError::Interrupt(err.to_string()))
}

fn write_sources(mut target: impl Write, sources: &[DocumentationSource]) {
    for (index, source) in sources.iter().enumerate() {
        writeln!(target, "{}. {source}", index + 1).ok();
    }
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
    if let CliError::Run(RunError::Partial { summary, .. }) = err {
        for failure in &summary.failed {
            writeln!(target, "  {}: {}", failure.source, failure.error).ok();
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
