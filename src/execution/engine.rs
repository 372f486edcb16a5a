//! Main execution engine - orchestrates the entire pipeline run

use crate::{
    core::{ExecutionStatus, Pipeline, PipelineError, PipelineOutcome, StepResult, StepState},
    execution::{ExecutionResult, StepExecutor},
    runner::StepRunner,
    staging::{AssetStager, StageReport},
};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Events that can occur during pipeline execution
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    PipelineStarted {
        execution_id: Uuid,
        pipeline_name: String,
        total_steps: usize,
    },
    StepStarted {
        index: usize,
        step_name: String,
        description: String,
    },
    StepSucceeded {
        step_name: String,
        elapsed: Duration,
    },
    StepFailed {
        step_name: String,
        error: String,
        stderr: String,
    },
    AssetsStaged {
        step_name: String,
        report: StageReport,
    },
    Notice {
        lines: Vec<String>,
    },
    PipelineFinished {
        execution_id: Uuid,
        status: ExecutionStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&ExecutionEvent) + Send + Sync>;

/// Main pipeline execution engine
///
/// Runs steps strictly in order and stops at the first failure.
pub struct ExecutionEngine<R, S> {
    executor: StepExecutor<R, S>,
    event_handlers: Vec<EventHandler>,
}

impl<R: StepRunner, S: AssetStager> ExecutionEngine<R, S> {
    pub fn new(runner: R, stager: S) -> Self {
        Self {
            executor: StepExecutor::new(runner, stager),
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    /// Execute the entire pipeline
    pub async fn execute(&self, pipeline: &mut Pipeline) -> PipelineOutcome {
        self.execute_until(pipeline, std::future::pending()).await
    }

    /// Execute the pipeline, aborting the current step when `shutdown` resolves
    ///
    /// The in-flight step future is dropped on shutdown, which kills any
    /// child process it owns.
    pub async fn execute_until<F>(&self, pipeline: &mut Pipeline, shutdown: F) -> PipelineOutcome
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let execution_id = pipeline.state.execution_id;
        let total_steps = pipeline.steps.len();

        info!("Starting pipeline execution: {} ({})", pipeline.name, execution_id);
        pipeline.state.start(total_steps);
        self.emit_event(ExecutionEvent::PipelineStarted {
            execution_id,
            pipeline_name: pipeline.name.clone(),
            total_steps,
        });

        let mut results = Vec::with_capacity(total_steps);

        for index in 0..total_steps {
            let step = pipeline.steps[index].clone();
            let started_at = Utc::now();
            let clock = Instant::now();

            pipeline.state.advance(index);
            pipeline.steps[index].state = StepState::Running { started_at };
            self.emit_event(ExecutionEvent::StepStarted {
                index,
                step_name: step.name.clone(),
                description: step.describe(),
            });

            let executed = tokio::select! {
                result = self.executor.execute(&step) => result,
                _ = &mut shutdown => Err(PipelineError::Interrupted { step: step.name.clone() }),
            };

            let failure = match executed {
                Ok(executed) => {
                    let succeeded = executed.succeeded();
                    let result = match executed {
                        ExecutionResult::Finished(result) => result,
                        ExecutionResult::Staged(report) => {
                            self.emit_event(ExecutionEvent::AssetsStaged {
                                step_name: step.name.clone(),
                                report,
                            });
                            StepResult::success(&step.name)
                        }
                        ExecutionResult::Announced(lines) => {
                            self.emit_event(ExecutionEvent::Notice { lines });
                            StepResult::success(&step.name)
                        }
                    };
                    let error = (!succeeded).then(|| PipelineError::NonZeroExit {
                        step: step.name.clone(),
                        code: result.exit_code,
                        stderr: result.stderr.clone(),
                    });
                    results.push(result);
                    error
                }
                Err(error) => {
                    results.push(StepResult::failure(&step.name, error.to_string()));
                    Some(error)
                }
            };

            match failure {
                None => {
                    pipeline.steps[index].state = StepState::Succeeded {
                        started_at,
                        completed_at: Utc::now(),
                    };
                    self.emit_event(ExecutionEvent::StepSucceeded {
                        step_name: step.name.clone(),
                        elapsed: clock.elapsed(),
                    });
                }
                Some(error) => {
                    return self.abort(pipeline, index, started_at, results, error);
                }
            }
        }

        pipeline.state.succeed();
        info!("Pipeline execution finished: {} - {:?}", pipeline.name, pipeline.state.status);
        self.emit_event(ExecutionEvent::PipelineFinished {
            execution_id,
            status: pipeline.state.status,
        });

        PipelineOutcome::succeeded(results)
    }

    /// Record a failed step, skip the rest and build the failed outcome
    fn abort(
        &self,
        pipeline: &mut Pipeline,
        index: usize,
        started_at: chrono::DateTime<Utc>,
        results: Vec<StepResult>,
        error: PipelineError,
    ) -> PipelineOutcome {
        let step_name = error.step().to_string();
        let stderr = match &error {
            PipelineError::NonZeroExit { stderr, .. } => stderr.clone(),
            _ => String::new(),
        };

        pipeline.steps[index].state = StepState::Failed {
            error: error.to_string(),
            started_at,
            failed_at: Utc::now(),
        };
        pipeline.skip_after(index, &format!("step '{}' did not succeed", step_name));

        if matches!(error, PipelineError::Interrupted { .. }) {
            warn!("Pipeline {} interrupted during step {}", pipeline.name, step_name);
            pipeline.state.interrupt(index);
        } else {
            error!("Pipeline {} failed: {}", pipeline.name, error);
            pipeline.state.fail(index);
        }

        self.emit_event(ExecutionEvent::StepFailed {
            step_name,
            error: error.to_string(),
            stderr,
        });
        self.emit_event(ExecutionEvent::PipelineFinished {
            execution_id: pipeline.state.execution_id,
            status: pipeline.state.status,
        });

        PipelineOutcome::failed(results, error)
    }
}
