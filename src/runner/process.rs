//! Subprocess runner - runs commands as child processes

use crate::core::{CommandSpec, StepResult};
use crate::runner::{RunnerError, StepRunner};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs command steps as child processes
///
/// stdout is inherited so tool logs show up live. stderr is piped, echoed
/// line by line to our own stderr and kept for the step result.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    /// Do not echo the child's stderr
    quiet_stderr: bool,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture stderr without echoing it
    pub fn quiet(mut self) -> Self {
        self.quiet_stderr = true;
        self
    }
}

#[async_trait]
impl StepRunner for ProcessRunner {
    async fn run(&self, step_name: &str, spec: &CommandSpec) -> Result<StepResult, RunnerError> {
        debug!(
            "Spawning '{}' for step {} in {}",
            spec,
            step_name,
            spec.working_dir.display()
        );

        // Dropping the child (interrupt) kills it
        let mut child = Command::new(&spec.command)
            .args(&spec.arguments)
            .current_dir(&spec.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                program: spec.command.clone(),
                source,
            })?;

        let io_error = |source: std::io::Error| RunnerError::Io {
            program: spec.command.clone(),
            source,
        };

        // Tools may print paths in any encoding; echo the bytes as they came
        // and only decode the captured copy
        let mut captured = Vec::new();
        if let Some(stderr) = child.stderr.take() {
            let mut reader = BufReader::new(stderr);
            let mut echo = tokio::io::stderr();
            let mut line = Vec::new();
            loop {
                line.clear();
                if reader.read_until(b'\n', &mut line).await.map_err(io_error)? == 0 {
                    break;
                }
                if !self.quiet_stderr {
                    echo.write_all(&line).await.map_err(io_error)?;
                }
                captured.extend_from_slice(&line);
            }
            echo.flush().await.map_err(io_error)?;
        }
        let captured = String::from_utf8_lossy(&captured).into_owned();

        let status = child.wait().await.map_err(io_error)?;
        let exit_code = status.code();

        if !status.success() {
            warn!(
                "{} exited with code {:?}: {}",
                spec.command,
                exit_code,
                captured.trim()
            );
        } else {
            debug!("{} finished successfully", spec.command);
        }

        Ok(StepResult {
            step_name: step_name.to_string(),
            exit_code,
            succeeded: status.success(),
            stderr: captured,
        })
    }
}
