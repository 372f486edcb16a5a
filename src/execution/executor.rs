//! Step executor - runs individual steps

use crate::{
    core::{PipelineError, Step, StepKind, StepResult},
    runner::StepRunner,
    staging::{AssetStager, StageReport},
};
use tracing::{debug, info};

/// Result of executing a step
#[derive(Debug, Clone)]
pub enum ExecutionResult {
    /// A process ran to completion; it may still have failed
    Finished(StepResult),
    /// Assets were staged or skipped
    Staged(StageReport),
    /// A message is ready for the user
    Announced(Vec<String>),
}

impl ExecutionResult {
    /// Check if the step succeeded
    pub fn succeeded(&self) -> bool {
        match self {
            ExecutionResult::Finished(result) => result.succeeded,
            ExecutionResult::Staged(_) | ExecutionResult::Announced(_) => true,
        }
    }
}

/// Executes a single step with a runner and a stager
pub struct StepExecutor<R, S> {
    runner: R,
    stager: S,
}

impl<R: StepRunner, S: AssetStager> StepExecutor<R, S> {
    pub fn new(runner: R, stager: S) -> Self {
        Self { runner, stager }
    }

    /// Execute a step and return the result
    ///
    /// Launch and copy failures come back as errors. A process that exits
    /// non-zero is a `Finished` result for the caller to judge.
    pub async fn execute(&self, step: &Step) -> Result<ExecutionResult, PipelineError> {
        info!("Executing step: {}", step.name);
        debug!("Step {}: {}", step.name, step.describe());

        match &step.kind {
            StepKind::Command(spec) => self
                .runner
                .run(&step.name, spec)
                .await
                .map(ExecutionResult::Finished)
                .map_err(|source| PipelineError::Spawn {
                    step: step.name.clone(),
                    source,
                }),
            StepKind::StageAssets { source, destination } => self
                .stager
                .stage(source, destination)
                .await
                .map(ExecutionResult::Staged)
                .map_err(|source| PipelineError::Copy {
                    step: step.name.clone(),
                    source,
                }),
            StepKind::Notice { lines } => Ok(ExecutionResult::Announced(lines.clone())),
        }
    }
}
