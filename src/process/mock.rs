use super::{CommandOutput, CommandSpec, ProcessError, ProcessRunner};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

type SideEffect = Arc<dyn Fn(&CommandSpec) -> io::Result<()> + Send + Sync>;

/// Canned result for a mocked command
#[derive(Clone)]
pub struct MockResponse {
    pub stdout: String,
    pub exit_code: i32,
    pub timed_out: bool,
    side_effect: Option<SideEffect>,
}

impl fmt::Debug for MockResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockResponse")
            .field("stdout", &self.stdout)
            .field("exit_code", &self.exit_code)
            .field("timed_out", &self.timed_out)
            .field("side_effect", &self.side_effect.is_some())
            .finish()
    }
}

impl MockResponse {
    /// Successful exit with the given standard output
    pub fn stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            exit_code: 0,
            timed_out: false,
            side_effect: None,
        }
    }

    /// Successful exit with no output
    pub fn success() -> Self {
        Self::stdout("")
    }

    pub fn failure(exit_code: i32, stdout: impl Into<String>) -> Self {
        Self {
            exit_code,
            ..Self::stdout(stdout)
        }
    }

    pub fn timeout() -> Self {
        Self {
            timed_out: true,
            ..Self::success()
        }
    }

    /// Runs `effect` against the command before the response is returned
    pub fn with_side_effect(
        mut self,
        effect: impl Fn(&CommandSpec) -> io::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.side_effect = Some(Arc::new(effect));
        self
    }
}

/// In-memory [`ProcessRunner`] returning canned responses
///
/// Responses are looked up by tool name (`jdeps`, `jlink`, `java`). A response
/// registered with [`MockProcessRunner::respond_for`] only applies when the command
/// has the given argument, which lets tests answer differently per archive. Every
/// invocation is recorded, including those that fail.
#[derive(Default)]
pub struct MockProcessRunner {
    defaults: Mutex<HashMap<String, MockResponse>>,
    targeted: Mutex<Vec<(String, String, MockResponse)>>,
    calls: Mutex<Vec<CommandSpec>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Response for every invocation of `tool` without a more specific match
    pub fn respond(&self, tool: impl Into<String>, response: MockResponse) -> &Self {
        locked(&self.defaults).insert(tool.into(), response);
        self
    }

    /// Response for invocations of `tool` whose arguments contain `arg`
    ///
    /// `arg` matches either a whole argument or the file name of a path argument.
    pub fn respond_for(
        &self,
        tool: impl Into<String>,
        arg: impl Into<String>,
        response: MockResponse,
    ) -> &Self {
        locked(&self.targeted).push((tool.into(), arg.into(), response));
        self
    }

    /// All recorded invocations, in call order
    pub fn calls(&self) -> Vec<CommandSpec> {
        locked(&self.calls).clone()
    }

    /// Recorded invocations of one tool
    pub fn calls_to(&self, tool: &str) -> Vec<CommandSpec> {
        locked(&self.calls)
            .iter()
            .filter(|c| c.tool_name() == tool)
            .cloned()
            .collect()
    }

    fn lookup(&self, command: &CommandSpec) -> Option<MockResponse> {
        let tool = command.tool_name();
        let targeted = locked(&self.targeted);
        let matched = targeted.iter().find(|(t, arg, _)| {
            *t == tool
                && command.args.iter().any(|a| {
                    a.to_string_lossy() == arg.as_str()
                        || Path::new(a)
                            .file_name()
                            .is_some_and(|n| n.to_string_lossy() == arg.as_str())
                })
        });
        if let Some((_, _, response)) = matched {
            return Some(response.clone());
        }
        drop(targeted);
        locked(&self.defaults).get(&tool).cloned()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        locked(&self.calls).push(command.clone());
        let command_line = command.command_line();

        let response = self.lookup(command).ok_or_else(|| ProcessError::Spawn {
            command: command_line.clone(),
            source: io::Error::new(io::ErrorKind::NotFound, "no mock response registered"),
        })?;

        if response.timed_out {
            return Err(ProcessError::Timeout {
                command: command_line,
                seconds: command.timeout.as_secs(),
            });
        }

        if let Some(effect) = &response.side_effect {
            effect(command).map_err(|source| ProcessError::Wait {
                command: command_line.clone(),
                source,
            })?;
        }

        if response.exit_code != 0 {
            return Err(ProcessError::NonZeroExit {
                command: command_line,
                code: Some(response.exit_code),
                output: response.stdout,
            });
        }

        Ok(CommandOutput::from_stdout(response.stdout))
    }
}
