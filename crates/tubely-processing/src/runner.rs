//! Bounded runner for external processes.

use std::ffi::OsStr;
use std::process::{Output, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tokio::sync::Semaphore;

use crate::error::ProcessingError;

/// Runs external tools with a global concurrency bound and a hard timeout.
///
/// Clones share the same permit pool. A child is killed when its timeout elapses
/// or when the future awaiting it is dropped (e.g. the client disconnected).
#[derive(Clone)]
pub struct ProcessRunner {
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            timeout,
        }
    }

    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run `program` with `args` to completion and return its output.
    ///
    /// A non-zero exit status is an error carrying the tool's stderr.
    #[tracing::instrument(skip(self, args), fields(process.executable.name = %program))]
    pub async fn run<I, S>(&self, program: &str, args: I) -> Result<Output, ProcessingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let queued = Instant::now();
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ProcessingError::PoolClosed)?;
        let waited_ms = queued.elapsed().as_secs_f64() * 1000.0;

        let start = Instant::now();
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessingError::Spawn {
                tool: program.to_string(),
                source,
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(ProcessingError::Spawn {
                    tool: program.to_string(),
                    source,
                })
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "External process timed out, killing it"
                );
                return Err(ProcessingError::TimedOut {
                    tool: program.to_string(),
                    timeout_secs: self.timeout.as_secs(),
                });
            }
        };

        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!(
                status = %output.status,
                stderr = %stderr,
                duration_ms,
                "External process failed"
            );
            return Err(ProcessingError::Failed {
                tool: program.to_string(),
                status: output.status.to_string(),
                stderr,
            });
        }

        tracing::debug!(waited_ms, duration_ms, "External process completed");
        Ok(output)
    }
}
