// src/recipe/kitchen/runner.rs

//! External command execution for the Kitchen
//!
//! Every hook talks to git, cmake and the system package tool through
//! [`CommandRunner`], so the Kitchen can run for real, as a dry run, or
//! against a recording runner in tests.

use crate::error::{Error, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

/// A command line to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Path argument, converted lossily
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().to_string())
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Command line as it would be typed into a shell
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains('"') {
                line.push_str(&format!("{:?}", arg));
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful, empty output
    pub fn ok() -> Self {
        Self {
            code: Some(0),
            ..Self::default()
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands on behalf of the Kitchen
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion
    ///
    /// A non-zero exit is not an error here; see [`run_checked`](Self::run_checked).
    fn run(&self, cmd: &CommandSpec) -> Result<CommandOutput>;

    /// Run a command and fail on a non-zero exit
    fn run_checked(&self, cmd: &CommandSpec) -> Result<CommandOutput> {
        let output = self.run(cmd)?;
        if !output.success() {
            return Err(Error::CommandFailed {
                program: cmd.program.clone(),
                code: output.code,
                stderr: output.stderr.trim_end().to_string(),
            });
        }
        Ok(output)
    }
}

/// Runs commands on the host
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    /// Kill commands that run longer than this (None = wait forever)
    pub timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<CommandOutput> {
        let program = which::which(&cmd.program)
            .map_err(|_| Error::ToolMissing(cmd.program.clone()))?;

        info!("Running: {}", cmd.command_line());

        let mut command = Command::new(&program);
        command
            .args(&cmd.args)
            .envs(cmd.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &cmd.cwd {
            command.current_dir(cwd);
        }

        let mut child = command
            .spawn()
            .map_err(|e| Error::IoError(format!("Failed to spawn {}: {}", cmd.program, e)))?;

        // Drain both pipes while waiting so a chatty build cannot fill them and stall
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = match self.timeout {
            Some(timeout) => match child.wait_timeout(timeout)? {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::Timeout {
                        program: cmd.program.clone(),
                        seconds: timeout.as_secs(),
                    });
                }
            },
            None => child.wait()?,
        };

        let output = CommandOutput {
            code: status.code(),
            stdout: stdout.map(join_drain).unwrap_or_default(),
            stderr: stderr.map(join_drain).unwrap_or_default(),
        };

        if output.success() {
            debug!("{} exited successfully", cmd.program);
        } else {
            warn!("{} exited with {:?}", cmd.program, output.code);
        }

        Ok(output)
    }
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_drain(handle: thread::JoinHandle<String>) -> String {
    handle.join().unwrap_or_default()
}

/// Logs commands instead of running them
#[derive(Debug, Clone, Default)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<CommandOutput> {
        match &cmd.cwd {
            Some(cwd) => info!("[dry-run] (in {}) {}", cwd.display(), cmd.command_line()),
            None => info!("[dry-run] {}", cmd.command_line()),
        }
        Ok(CommandOutput::ok())
    }
}

/// Records every command and answers with a fixed success
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingRunner {
    pub calls: std::sync::Mutex<Vec<CommandSpec>>,
}

#[cfg(test)]
impl RecordingRunner {
    pub fn command_lines(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(CommandSpec::command_line)
            .collect()
    }
}

#[cfg(test)]
impl CommandRunner for RecordingRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(cmd.clone());
        Ok(CommandOutput::ok())
    }
}
