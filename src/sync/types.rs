//! Core sync types and command runner abstraction.

use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

use crate::sync::SyncError;

/// Result of running an external command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandOutput {
    /// Exit code reported by the process, if available.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns `true` when the exit code equals zero.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Renders the exit code for error messages, using `unknown` when the
    /// process was terminated by a signal.
    #[must_use]
    pub fn status_text(&self) -> String {
        self.code
            .map_or_else(|| String::from("unknown"), |code| code.to_string())
    }
}

/// Abstraction over command execution to support fakes in tests.
pub trait CommandRunner {
    /// Runs `program` with the given arguments, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Spawn`] if the command cannot be started.
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, SyncError>;
}

/// Real command runner that shells out to the host operating system.
#[derive(Clone, Debug, Default)]
pub struct ProcessCommandRunner;

impl CommandRunner for ProcessCommandRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, SyncError> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|err| spawn_error(program, &err))?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Command runner that forwards child output to the parent's stdout and
/// stderr as it arrives while still capturing it.
///
/// Used by the CLI so progress from the version-control client stays visible.
#[derive(Clone, Debug, Default)]
pub struct StreamingCommandRunner;

impl CommandRunner for StreamingCommandRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, SyncError> {
        let mut child = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| spawn_error(program, &err))?;

        let child_stdout = child.stdout.take().ok_or_else(|| SyncError::Spawn {
            program: program.to_owned(),
            message: String::from("stdout pipe unavailable"),
        })?;
        let child_stderr = child.stderr.take().ok_or_else(|| SyncError::Spawn {
            program: program.to_owned(),
            message: String::from("stderr pipe unavailable"),
        })?;

        let stdout_pump = thread::spawn(move || tee(child_stdout, io::stdout()));
        let stderr_pump = thread::spawn(move || tee(child_stderr, io::stderr()));

        let status = child.wait().map_err(|err| spawn_error(program, &err))?;
        let stdout = join_pump(stdout_pump, program)?;
        let stderr = join_pump(stderr_pump, program)?;

        Ok(CommandOutput {
            code: status.code(),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}

fn tee(mut reader: impl Read, mut sink: impl Write) -> io::Result<Vec<u8>> {
    let mut captured = Vec::new();
    let mut buffer = [0_u8; 8192];
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            return Ok(captured);
        }
        let chunk = buffer.get(..read).unwrap_or_default();
        // Forwarding is best effort; the captured copy is authoritative.
        sink.write_all(chunk).ok();
        sink.flush().ok();
        captured.extend_from_slice(chunk);
    }
}

fn join_pump(pump: JoinHandle<io::Result<Vec<u8>>>, program: &str) -> Result<Vec<u8>, SyncError> {
    pump.join()
        .map_err(|_| SyncError::Spawn {
            program: program.to_owned(),
            message: String::from("output forwarding thread panicked"),
        })?
        .map_err(|err| spawn_error(program, &err))
}

fn spawn_error(program: &str, err: &io::Error) -> SyncError {
    SyncError::Spawn {
        program: program.to_owned(),
        message: err.to_string(),
    }
}
