//! Pipeline domain model

use crate::core::{
    config::BuildConfig,
    error::PipelineError,
    state::{ExecutionStatus, PipelineState, StepState},
    step::{CommandSpec, Step, StepResult},
};
use serde::Serialize;

pub const COMPILE_STEP: &str = "compile";
pub const STAGE_ASSETS_STEP: &str = "stage-assets";
pub const SERVE_HINT_STEP: &str = "serve-hint";

/// Exit code used when no better code is available
pub const GENERIC_FAILURE_CODE: i32 = 1;

/// Exit code used when the user interrupted the run
pub const INTERRUPTED_CODE: i32 = 130;

/// An ordered list of steps
#[derive(Debug, Clone, Serialize)]
pub struct Pipeline {
    /// Pipeline name
    pub name: String,

    /// Steps in execution order
    pub steps: Vec<Step>,

    /// Execution state
    #[serde(skip)]
    pub state: PipelineState,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps,
            state: PipelineState::new(),
        }
    }

    /// Plan the compile, asset staging and serve hint steps for a build
    pub fn from_config(config: &BuildConfig) -> Self {
        let mut steps = Vec::with_capacity(3);

        let compile = CommandSpec::new(config.tool.clone(), config.crate_dir.clone())
            .args(config.compiler_args());
        steps.push(Step::command(COMPILE_STEP, compile));

        if let (Some(source), Some(destination)) =
            (config.assets_path(), config.staged_assets_path())
        {
            steps.push(Step::stage_assets(STAGE_ASSETS_STEP, source, destination));
        }

        let out_dir = config.out_path();
        steps.push(Step::notice(
            SERVE_HINT_STEP,
            [
                format!("Build output is in {}", out_dir.display()),
                "Serve it with:".to_string(),
                format!("  cd {} && {} {}", out_dir.display(), config.serve.command, config.serve.port),
                format!("Then open {}", config.serve_url()),
            ],
        ));

        Self::new(config.package_name(), steps)
    }

    /// Get a step by name
    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Check if pipeline has failed
    pub fn has_failed(&self) -> bool {
        matches!(
            self.state.status,
            ExecutionStatus::Failed(_) | ExecutionStatus::Interrupted(_)
        )
    }

    /// Mark every step after `index` as skipped
    pub fn skip_after(&mut self, index: usize, reason: &str) {
        for step in self.steps.iter_mut().skip(index + 1) {
            if matches!(step.state, StepState::Pending) {
                step.state = StepState::Skipped {
                    reason: reason.to_string(),
                };
            }
        }
    }
}

/// Outcome of a whole pipeline run
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Results of the steps that ran, in order
    pub results: Vec<StepResult>,

    /// Whether every step succeeded
    pub success: bool,

    /// The error that stopped the pipeline, if any
    pub failure: Option<PipelineError>,
}

impl PipelineOutcome {
    pub fn succeeded(results: Vec<StepResult>) -> Self {
        Self {
            results,
            success: true,
            failure: None,
        }
    }

    pub fn failed(results: Vec<StepResult>, error: PipelineError) -> Self {
        Self {
            results,
            success: false,
            failure: Some(error),
        }
    }

    /// Process exit code for this outcome
    ///
    /// A failing step's own exit code is propagated when it fits in a process
    /// exit status; everything else maps to a generic failure code.
    pub fn exit_code(&self) -> i32 {
        if self.success {
            return 0;
        }

        match &self.failure {
            Some(PipelineError::NonZeroExit { code: Some(code), .. }) if (1..=255).contains(code) => *code,
            Some(PipelineError::Interrupted { .. }) => INTERRUPTED_CODE,
            _ => GENERIC_FAILURE_CODE,
        }
    }

    /// Names of the steps that ran, in order
    pub fn executed_steps(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.step_name.as_str()).collect()
    }
}
