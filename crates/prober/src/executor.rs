//! Command executors for probing the target environment.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Default upper bound for a single probe subprocess.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for command execution.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Execute `program` with `args` and return (exit_code, stdout, stderr).
    async fn execute(&self, program: &Path, args: &[&str]) -> Result<(Option<i32>, String, String)>;
}

/// Local executor with a per-command timeout.
///
/// A command that outlives the timeout is killed and reported as an error.
pub struct LocalExecutor {
    timeout: Duration,
}

impl LocalExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for LocalExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

#[async_trait]
impl Executor for LocalExecutor {
    async fn execute(&self, program: &Path, args: &[&str]) -> Result<(Option<i32>, String, String)> {
        debug!("Local exec: {} {:?}", program.display(), args);

        let mut command = Command::new(program);
        command
            .args(args)
            .env("PYTHONIOENCODING", "utf-8")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                anyhow::anyhow!(
                    "{} timed out after {}s",
                    program.display(),
                    self.timeout.as_secs()
                )
            })?
            .with_context(|| format!("Failed to execute {}", program.display()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let exit_code = output.status.code();

        Ok((exit_code, stdout, stderr))
    }
}
