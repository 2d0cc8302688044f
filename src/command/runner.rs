// src/command/runner.rs

//! Blocking command execution with a timeout
//!
//! Chocolatey holds an exclusive lock on its local state, so invocations are
//! never run concurrently: every call blocks until the child exits or the
//! timeout elapses.

use crate::error::{Error, Result};
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    /// Exit code, `-1` when terminated by a signal
    pub status: i32,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            status: 0,
        }
    }
}

/// Executes a rendered command line
///
/// Implementations fail with [`Error::ExecutionError`] on non-zero exit or
/// timeout. Retrying, if wanted, belongs here rather than in the planner.
pub trait CommandRunner {
    fn run(&self, command: &str, timeout: Duration) -> Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &str, timeout: Duration) -> Result<CommandOutput> {
        (**self).run(command, timeout)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&self, command: &str, timeout: Duration) -> Result<CommandOutput> {
        (**self).run(command, timeout)
    }
}

/// Runs command lines through the platform shell
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }

    fn shell(command: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        }
    }
}

/// Drain a child pipe on its own thread so a chatty child cannot fill the
/// pipe buffer and block before the timeout is checked
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &str, timeout: Duration) -> Result<CommandOutput> {
        debug!("Executing: {}", command);

        let mut child = Self::shell(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::execution(command, format!("failed to spawn: {}", e)))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match child.wait_timeout(timeout)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::execution(
                    command,
                    format!("timed out after {} seconds", timeout.as_secs()),
                ));
            }
        };

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();
        let code = status.code().unwrap_or(-1);

        if !status.success() {
            for line in stderr.lines().chain(stdout.lines()).filter(|l| !l.trim().is_empty()) {
                warn!("[choco] {}", line);
            }
            return Err(Error::execution(command, format!("exit code {}", code)));
        }

        Ok(CommandOutput {
            stdout,
            status: code,
        })
    }
}
