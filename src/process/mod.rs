//! External tool execution
//!
//! Every external tool invocation goes through the [`ProcessRunner`] trait so that the
//! resolver and linker can be driven by [`MockProcessRunner`] in tests and by
//! [`SystemProcessRunner`] in production.
//!
//! A command that exits non-zero or outlives its timeout is always an error; there is
//! no retry at this level.

mod mock;
mod system;

pub use mock::{MockProcessRunner, MockResponse};
pub use system::SystemProcessRunner;

use async_trait::async_trait;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while running an external command
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to start command: {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Command failed with exit code {}: {command}", display_code(.code))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("Command timed out after {seconds}s: {command}")]
    Timeout { command: String, seconds: u64 },

    #[error("Failed waiting for command: {command}: {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "<terminated by signal>".to_string(),
    }
}

impl ProcessError {
    /// The command line that failed
    pub fn command(&self) -> &str {
        match self {
            ProcessError::Spawn { command, .. }
            | ProcessError::NonZeroExit { command, .. }
            | ProcessError::Timeout { command, .. }
            | ProcessError::Wait { command, .. } => command,
        }
    }
}

/// An external command: executable, ordered arguments and a deadline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// File stem of the executable, e.g. `jdeps` for `/opt/jdk/bin/jdeps.exe`
    pub fn tool_name(&self) -> String {
        self.program
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Space-joined command line for logs and error messages
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Value following `flag` in the argument vector, if any
    pub fn arg_after(&self, flag: &str) -> Option<&OsStr> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(OsString::as_os_str)
    }

    pub fn has_arg(&self, value: impl AsRef<Path>) -> bool {
        let value = value.as_ref().as_os_str();
        self.args.iter().any(|a| a == value)
    }
}

/// Captured output of a successful command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn from_stdout(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }

    /// Standard output split into trimmed, non-empty lines
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Runs external commands to completion
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs the command, failing on spawn error, non-zero exit or timeout
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ProcessError>;

    /// Runs the command and returns its standard output as trimmed lines
    async fn run_lines(&self, command: &CommandSpec) -> Result<Vec<String>, ProcessError> {
        Ok(self.run(command).await?.lines())
    }
}
