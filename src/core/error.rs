//! Pipeline error taxonomy

use crate::runner::RunnerError;
use crate::staging::StageError;
use thiserror::Error;

/// Why a pipeline stopped
///
/// A missing assets directory is not represented here: staging reports it as
/// a skip and the pipeline carries on.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The tool could not be launched or waited on
    #[error("step '{step}': {source}")]
    Spawn {
        step: String,
        #[source]
        source: RunnerError,
    },

    /// The tool ran and reported failure
    #[error("step '{step}' {}", describe_exit(.code))]
    NonZeroExit {
        step: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Asset staging failed part way
    #[error("step '{step}': {source}")]
    Copy {
        step: String,
        #[source]
        source: StageError,
    },

    /// The user interrupted the run
    #[error("step '{step}' was interrupted")]
    Interrupted { step: String },
}

impl PipelineError {
    /// Name of the step the error belongs to
    pub fn step(&self) -> &str {
        match self {
            PipelineError::Spawn { step, .. }
            | PipelineError::NonZeroExit { step, .. }
            | PipelineError::Copy { step, .. }
            | PipelineError::Interrupted { step } => step,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with code {}", code),
        None => "was terminated by a signal".to_string(),
    }
}
