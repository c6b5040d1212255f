//! External command execution with captured output and a hard timeout.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// One external command invocation.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Executable name or path.
    pub program: String,

    /// Arguments passed to the executable.
    pub args: Vec<String>,

    /// Extra environment variables for the child process.
    pub envs: Vec<(String, String)>,

    /// Working directory (inherits the parent's when `None`).
    pub cwd: Option<PathBuf>,

    /// Hard timeout in seconds; 0 disables the timeout.
    pub timeout_secs: u64,
}

impl CommandSpec {
    /// Create a spec for `program` with no arguments and no timeout.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            cwd: None,
            timeout_secs: 0,
        }
    }

    /// Append arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Set the working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Set the hard timeout.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Result of one command execution.
///
/// Immutable once produced. A non-zero exit code is a normal, representable
/// outcome; a timed-out execution carries `timed_out = true` and
/// `exit_code = -1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Exit code (0 = success, -1 = killed or not representable).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,

    /// Whether the command was killed after exceeding its timeout.
    pub timed_out: bool,
}

impl ExecutionResult {
    /// Whether the command completed with exit code 0.
    pub fn passed(&self) -> bool {
        !self.timed_out && self.exit_code == 0
    }
}

/// Executes external commands one at a time with captured stdio.
pub struct CommandRunner;

impl CommandRunner {
    /// Execute a command to completion.
    ///
    /// Output is captured, not streamed. `Err` is reserved for spawn
    /// failures (missing executable, unreadable working directory); every
    /// completed execution, including non-zero exits and timeouts, returns
    /// `Ok`.
    pub async fn run(spec: &CommandSpec) -> std::io::Result<ExecutionResult> {
        let start = Instant::now();

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in &spec.envs {
            command.env(key, value);
        }
        if let Some(dir) = &spec.cwd {
            command.current_dir(dir);
        }

        let child = command.spawn()?;

        let output = if spec.timeout_secs > 0 {
            match tokio::time::timeout(
                Duration::from_secs(spec.timeout_secs),
                child.wait_with_output(),
            )
            .await
            {
                Ok(result) => result?,
                Err(_) => {
                    // Timeout elapsed; the child is killed on drop.
                    return Ok(ExecutionResult {
                        exit_code: -1,
                        stdout: String::new(),
                        stderr: String::new(),
                        duration_ms: start.elapsed().as_millis() as u64,
                        timed_out: true,
                    });
                }
            }
        } else {
            child.wait_with_output().await?
        };

        Ok(ExecutionResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
            timed_out: false,
        })
    }
}
