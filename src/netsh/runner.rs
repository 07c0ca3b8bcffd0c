//! Execution of external commands.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::Command;

use crate::{Error, Result};

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs an external program and captures its output.
pub trait CommandRunner {
    /// Run `program` with `args` and wait for it to exit.
    ///
    /// A non-zero exit status is an error.
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Runs commands as child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        log::debug!("Running {} {}", program, args.join(" "));

        let output = Command::new(program).args(args).output()?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            // netsh reports most failures on stdout
            let message = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(Error::CommandFailed {
                program: program.to_string(),
                status: output.status.to_string(),
                message,
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

/// Runner that records invocations and replays queued outputs.
///
/// When the queue is empty each call succeeds with empty output.
#[doc(hidden)]
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Vec<String>>>,
    responses: RefCell<VecDeque<Result<CommandOutput>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue stdout for the next call.
    pub fn push_stdout(&self, stdout: impl Into<String>) {
        self.responses.borrow_mut().push_back(Ok(CommandOutput {
            stdout: stdout.into(),
            stderr: String::new(),
        }));
    }

    /// Queue an error for the next call.
    pub fn push_error(&self, error: Error) {
        self.responses.borrow_mut().push_back(Err(error));
    }

    /// All invocations so far, each rendered as program followed by args.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// All invocations so far, each joined into one line.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.join(" ")).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let mut call = Vec::with_capacity(args.len() + 1);
        call.push(program.to_string());
        call.extend(args.iter().cloned());
        self.calls.borrow_mut().push(call);

        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(CommandOutput::default()))
    }
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        (**self).run(program, args)
    }
}
