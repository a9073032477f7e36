use super::{CommandOutput, CommandSpec, ProcessError, ProcessRunner};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Runs commands as child processes of the current process
///
/// Children are killed when their deadline passes or when the awaiting task is
/// cancelled, so an aborted pipeline leaves no stray tool processes behind.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessRunner {
    verbose: bool,
}

impl SystemProcessRunner {
    /// When `verbose` is set every command line is logged at info level before it runs
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        let command_line = command.command_line();
        if self.verbose {
            info!(command = %command_line, "Executing");
        } else {
            debug!(command = %command_line, "Executing");
        }

        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        let output = match timeout(command.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| ProcessError::Wait {
                command: command_line.clone(),
                source,
            })?,
            Err(_) => {
                warn!(
                    command = %command_line,
                    timeout_secs = command.timeout.as_secs(),
                    "Command exceeded its deadline and was killed"
                );
                return Err(ProcessError::Timeout {
                    command: command_line,
                    seconds: command.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            for line in stdout.lines() {
                error!("{}", line);
            }
            for line in String::from_utf8_lossy(&output.stderr).lines() {
                error!("{}", line);
            }
            return Err(ProcessError::NonZeroExit {
                command: command_line,
                code: output.status.code(),
                output: stdout,
            });
        }

        Ok(CommandOutput {
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
