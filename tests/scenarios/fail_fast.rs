//! Test: a failing step stops the pipeline

use crate::helpers::*;
use wasm_pipeline::{PipelineError, StepState};

/// A failed compile never reaches asset staging or the serve hint
#[tokio::test]
async fn test_failed_compile_stops_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "assets/a.txt", b"alpha");
    let config = config_in(dir.path());

    let log = new_call_log();
    let runner = MockRunner::new(log).exit_with("compile", 1);
    let result = run_with_runner(&config, runner).await;

    assert_pipeline_failed(&result);
    assert_calls(&result, &["run:compile"]);
    assert_eq!(result.outcome.executed_steps(), vec!["compile"]);

    assert!(matches!(result.step_state("compile"), StepState::Failed { .. }));
    assert!(matches!(result.step_state("stage-assets"), StepState::Skipped { .. }));
    assert!(matches!(result.step_state("serve-hint"), StepState::Skipped { .. }));

    // Nothing was staged into the output directory
    assert!(!dir.path().join("pkg").exists());
}

/// A missing compiler is a spawn error and also stops the pipeline
#[tokio::test]
async fn test_missing_tool_stops_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let runner = MockRunner::new(new_call_log()).without_tool("wasm-pack");
    let result = run_with_runner(&config, runner).await;

    assert_pipeline_failed(&result);
    assert_calls(&result, &["run:compile"]);
    assert!(matches!(
        result.outcome.failure,
        Some(PipelineError::Spawn { ref step, .. }) if step == "compile"
    ));

    let compile = &result.outcome.results[0];
    assert!(!compile.succeeded);
    assert_eq!(compile.exit_code, None);
}

/// A staging failure stops the pipeline before the serve hint
#[cfg(unix)]
#[tokio::test]
async fn test_copy_failure_stops_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "assets/a.txt", b"alpha");
    // A file where the output directory should be
    write_file(dir.path(), "pkg", b"");
    let config = config_in(dir.path());

    let result = run_successfully(&config).await;

    assert_pipeline_failed(&result);
    assert_eq!(result.outcome.executed_steps(), vec!["compile", "stage-assets"]);
    assert!(matches!(result.outcome.failure, Some(PipelineError::Copy { .. })));
    assert!(matches!(result.step_state("serve-hint"), StepState::Skipped { .. }));
}

/// Every step runs, in order, when nothing fails
#[tokio::test]
async fn test_steps_run_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let result = run_successfully(&config).await;

    assert_pipeline_succeeded(&result);
    assert_calls(&result, &["run:compile", "stage"]);
    assert_eq!(
        result.outcome.executed_steps(),
        vec!["compile", "stage-assets", "serve-hint"]
    );
}
