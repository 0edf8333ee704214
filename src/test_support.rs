//! Test support utilities shared across unit and integration tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::rc::Rc;

use camino::{Utf8Path, Utf8PathBuf};

use crate::sync::{CommandOutput, CommandRunner, SyncError, copy_tree};

#[derive(Clone, Debug)]
enum ScriptedResponse {
    Output(CommandOutput),
    CloneFrom(Utf8PathBuf),
}

/// Scripted command runner that returns pre-seeded outputs in FIFO order.
///
/// Used to drive deterministic command outcomes without spawning processes.
/// A clone can be simulated by copying a fixture tree into the destination
/// argument of the invocation.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRunner {
    responses: Rc<RefCell<VecDeque<ScriptedResponse>>>,
    invocations: Rc<RefCell<Vec<CommandInvocation>>>,
}

/// Records a single invocation made through [`ScriptedRunner`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandInvocation {
    /// Program name as passed to the runner.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<OsString>,
}

impl CommandInvocation {
    /// Returns a shell-like command string for assertions.
    #[must_use]
    pub fn command_string(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.clone());
        parts.extend(
            self.args
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }

    /// Returns the final argument, which for `git clone` is the destination.
    #[must_use]
    pub fn destination(&self) -> Option<Utf8PathBuf> {
        self.args
            .last()
            .map(|arg| Utf8PathBuf::from(arg.to_string_lossy().into_owned()))
    }
}

impl ScriptedRunner {
    /// Creates a new runner with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all invocations recorded so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<CommandInvocation> {
        self.invocations.borrow().clone()
    }

    /// Pushes a successful exit status without producing any files.
    pub fn push_success(&self) {
        self.push_output(Some(0), "", "");
    }

    /// Pushes a failing exit code with stderr text.
    pub fn push_failure(&self, code: i32) {
        self.push_output(Some(code), "", "simulated failure");
    }

    /// Pushes a response with no exit code to simulate abnormal termination.
    pub fn push_missing_exit_code(&self) {
        self.push_output(None, "", "");
    }

    /// Pushes an explicit command output response.
    pub fn push_output(
        &self,
        code: Option<i32>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) {
        self.responses
            .borrow_mut()
            .push_back(ScriptedResponse::Output(CommandOutput {
                code,
                stdout: stdout.into(),
                stderr: stderr.into(),
            }));
    }

    /// Pushes a successful clone that copies `fixture` into the destination
    /// argument of the invocation.
    pub fn push_clone_from(&self, fixture: impl Into<Utf8PathBuf>) {
        self.responses
            .borrow_mut()
            .push_back(ScriptedResponse::CloneFrom(fixture.into()));
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, SyncError> {
        let invocation = CommandInvocation {
            program: program.to_owned(),
            args: args.to_vec(),
        };
        let destination = invocation.destination();
        self.invocations.borrow_mut().push(invocation);

        let response =
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| SyncError::Spawn {
                    program: program.to_owned(),
                    message: String::from("no scripted response available"),
                })?;

        match response {
            ScriptedResponse::Output(output) => Ok(output),
            ScriptedResponse::CloneFrom(fixture) => {
                let target = destination.ok_or_else(|| SyncError::Spawn {
                    program: program.to_owned(),
                    message: String::from("clone invoked without a destination"),
                })?;
                simulate_clone(&fixture, &target)?;
                Ok(CommandOutput {
                    code: Some(0),
                    stdout: String::new(),
                    stderr: format!("Cloning into '{target}'...\n"),
                })
            }
        }
    }
}

fn simulate_clone(fixture: &Utf8Path, target: &Utf8Path) -> Result<(), SyncError> {
    copy_tree(fixture, target).map(|_| ())
}
