//! Step runner - launches external commands

pub mod process;

use crate::core::{CommandSpec, StepResult};
use async_trait::async_trait;
use thiserror::Error;

pub use process::ProcessRunner;

/// Error types for runner operations
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The executable could not be found or started
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process started but waiting on it or reading its output failed
    #[error("I/O error while running '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Trait for running a command step - allows for different implementations
///
/// A non-zero exit is not an error at this layer: it comes back as a
/// `StepResult` with `succeeded == false` and the caller decides.
#[async_trait]
pub trait StepRunner: Send + Sync {
    async fn run(&self, step_name: &str, spec: &CommandSpec) -> Result<StepResult, RunnerError>;
}
