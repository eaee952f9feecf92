// src/core/runner.rs

use crate::core::catalog;
use crate::core::models::ToolOutput;
use async_trait::async_trait;
use std::fmt;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// An external program plus its argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: &str) -> Self {
        Self { program: program.to_string(), args: Vec::new() }
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
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs external tools on behalf of the probes.
///
/// Implementations never fail: every problem is folded into a `ToolOutput`
/// variant so the pipeline can keep going with degraded data.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &ToolCommand, deadline: Duration) -> ToolOutput;
}

/// Spawns real child processes with `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &ToolCommand, deadline: Duration) -> ToolOutput {
        info!(command = %command, timeout_secs = deadline.as_secs(), "Running external tool.");

        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let hint = catalog::get_tool_detail(&command.program).map(|d| d.install_hint);
                warn!(tool = %command.program, hint = ?hint, "Executable not found.");
                return ToolOutput::Missing { tool: command.program.clone() };
            }
            Err(e) => {
                warn!(tool = %command.program, error = %e, "Failed to spawn external tool.");
                return ToolOutput::Failed { tool: command.program.clone(), reason: e.to_string() };
            }
        };

        // Dropping the `wait_with_output` future on timeout drops the child,
        // and `kill_on_drop` takes care of the process.
        match timeout(deadline, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                debug!(
                    tool = %command.program,
                    status = ?output.status.code(),
                    stdout_bytes = output.stdout.len(),
                    stderr_bytes = output.stderr.len(),
                    "External tool exited."
                );
                let stdout = String::from_utf8_lossy(&output.stdout);
                if stdout.is_empty() {
                    ToolOutput::Completed(String::from_utf8_lossy(&output.stderr).into_owned())
                } else {
                    ToolOutput::Completed(stdout.into_owned())
                }
            }
            Ok(Err(e)) => {
                warn!(tool = %command.program, error = %e, "Failed while waiting for external tool.");
                ToolOutput::Failed { tool: command.program.clone(), reason: e.to_string() }
            }
            Err(_) => {
                warn!(tool = %command.program, timeout_secs = deadline.as_secs(), "External tool timed out.");
                ToolOutput::TimedOut { secs: deadline.as_secs() }
            }
        }
    }
}
