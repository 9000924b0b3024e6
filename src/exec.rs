use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::process::{Command, Output, Stdio};

/// Result of a command execution.
#[derive(Debug)]
pub struct ExecResult {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Where a child's output stream goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Collected into [`ExecResult`].
    Capture,
    /// Shared with the parent terminal.
    Inherit,
    /// Sent to the null device.
    Discard,
}

impl Stream {
    fn stdio(self) -> Stdio {
        match self {
            Self::Capture => Stdio::piped(),
            Self::Inherit => Stdio::inherit(),
            Self::Discard => Stdio::null(),
        }
    }
}

/// Full description of one child process.
///
/// Everything the child needs is carried here; the parent's working
/// directory and environment are never mutated to pass configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Extra environment entries added on top of the inherited environment.
    pub env: BTreeMap<String, String>,
    pub stdout: Stream,
    pub stderr: Stream,
    /// Give the child the parent's stdin instead of the null device.
    pub attach_stdin: bool,
}

impl CommandSpec {
    /// A command with captured output and no extra environment.
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            env: BTreeMap::new(),
            stdout: Stream::Capture,
            stderr: Stream::Capture,
            attach_stdin: false,
        }
    }

    /// Add an environment entry for this invocation only.
    #[must_use]
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Route both output streams.
    #[must_use]
    pub const fn streams(mut self, stdout: Stream, stderr: Stream) -> Self {
        self.stdout = stdout;
        self.stderr = stderr;
        self
    }

    /// Let the child read from the parent's stdin.
    #[must_use]
    pub const fn attach_stdin(mut self) -> Self {
        self.attach_stdin = true;
        self
    }

    /// Render as a shell-like line for trace output.
    #[must_use]
    pub fn display(&self) -> String {
        let mut parts: Vec<String> = self.env.iter().map(|(k, v)| format!("{k}={v}")).collect();
        parts.push(self.program.clone());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Abstraction over process execution so tasks can be tested without
/// spawning real programs.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command with captured output. Fails if the command exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let result = self.run_unchecked(program, args)?;
        if !result.success {
            bail!(
                "{program} failed (exit {}): {}",
                result.code.unwrap_or(-1),
                result.stderr.trim()
            );
        }
        Ok(result)
    }

    /// Run a command with captured output, returning the result regardless of
    /// exit status.
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be spawned.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.run_spec(&CommandSpec::new(program, args.iter().copied()))
    }

    /// Run a fully described command, returning the result regardless of exit
    /// status. Streams not set to [`Stream::Capture`] yield empty strings.
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be spawned.
    fn run_spec(&self, spec: &CommandSpec) -> Result<ExecResult>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_spec(&self, spec: &CommandSpec) -> Result<ExecResult> {
        tracing::debug!(target: "vimfiles::exec", "$ {}", spec.display());
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .envs(&spec.env)
            .stdout(spec.stdout.stdio())
            .stderr(spec.stderr.stdio())
            .stdin(if spec.attach_stdin {
                Stdio::inherit()
            } else {
                Stdio::null()
            });
        let output = cmd
            .output()
            .with_context(|| format!("failed to execute: {}", spec.program))?;
        Ok(ExecResult::from(output))
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
