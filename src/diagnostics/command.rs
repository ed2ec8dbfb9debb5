//! External command execution.
//!
//! # Responsibilities
//! - Run a diagnostic tool with an explicit argv (no shell)
//! - Capture stdout followed by stderr as one text blob
//! - Bound every run with a timeout; the child is killed when abandoned

use std::process::Stdio;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use thiserror::Error;
use tokio::process::Command;
use tokio::time;

/// Combined output and exit status of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub output: String,
    /// Exit code; `-1` when the process was ended by a signal.
    pub exit_code: i32,
}

/// Errors that prevent a command from producing output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("failed to start '{program}': {reason}")]
    Spawn { program: String, reason: String },

    #[error("'{program}' did not finish within {secs} seconds")]
    Timeout { program: String, secs: u64 },
}

/// Something that can run a program to completion.
pub trait CommandRunner: Send + Sync {
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [String],
    ) -> BoxFuture<'a, Result<CommandOutput, CommandError>>;
}

/// Runs programs on the local host via `tokio::process`.
#[derive(Debug, Clone)]
pub struct SystemCommandRunner {
    timeout: Duration,
}

impl SystemCommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [String],
    ) -> BoxFuture<'a, Result<CommandOutput, CommandError>> {
        async move {
            tracing::info!(program, args = ?args, "Running command");

            let child = Command::new(program)
                .args(args)
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output();

            let output = match time::timeout(self.timeout, child).await {
                Ok(Ok(output)) => output,
                Ok(Err(e)) => {
                    return Err(CommandError::Spawn {
                        program: program.to_string(),
                        reason: e.to_string(),
                    })
                }
                Err(_) => {
                    return Err(CommandError::Timeout {
                        program: program.to_string(),
                        secs: self.timeout.as_secs(),
                    })
                }
            };

            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));

            Ok(CommandOutput {
                output: text,
                exit_code: output.status.code().unwrap_or(-1),
            })
        }
        .boxed()
    }
}
