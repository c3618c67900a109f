use std::time::Duration;

use async_trait::async_trait;
use rgscan_common::debug;
use rgscan_common::error::{Result, ScanError};
use tokio::process::Command;

#[cfg(windows)]
const AZ_PROGRAM: &str = "az.cmd";
#[cfg(not(windows))]
const AZ_PROGRAM: &str = "az";

/// Runs a provider CLI and returns its stdout.
///
/// A non-zero exit is an error carrying the program's stderr as-is.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, args: &[String]) -> Result<String>;
}

/// The real `az` executable.
#[derive(Debug, Clone)]
pub struct AzCli {
    program: String,
    timeout: Duration,
}

impl AzCli {
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: AZ_PROGRAM.to_string(),
            timeout,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait]
impl CommandRunner for AzCli {
    async fn run(&self, args: &[String]) -> Result<String> {
        debug!("{} {}", self.program, args.join(" "));

        let mut command = Command::new(&self.program);
        command.args(args).kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| ScanError::CommandTimedOut {
                program: self.program.clone(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|err| ScanError::Command {
                program: self.program.clone(),
                message: err.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            };
            return Err(ScanError::Command {
                program: self.program.clone(),
                message,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
