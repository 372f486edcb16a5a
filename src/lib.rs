//! wasm-pipeline - build a WebAssembly package, stage its assets and print
//! how to serve it

pub mod cli;
pub mod core;
pub mod execution;
pub mod runner;
pub mod staging;

// Re-export commonly used types
pub use crate::core::{
    CommandSpec, ExecutionStatus, Pipeline, PipelineError, PipelineOutcome, Step, StepKind,
    StepResult, StepState,
};
pub use execution::{ExecutionEngine, ExecutionEvent};
pub use runner::{ProcessRunner, RunnerError, StepRunner};
pub use staging::{AssetStager, FsAssetStager, StageError, StageReport};
