//! Test: process exit codes derived from pipeline outcomes

use crate::helpers::*;

/// Compiler exits 0 and there are no assets: exit code 0
#[tokio::test]
async fn test_clean_build_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let result = run_successfully(&config).await;

    assert_pipeline_succeeded(&result);
    assert_eq!(result.outcome.exit_code(), 0);
}

/// Compiler exits 1: pipeline exit code is non-zero and staging never runs
#[tokio::test]
async fn test_compile_failure_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "assets/a.txt", b"alpha");
    let config = config_in(dir.path());

    let runner = MockRunner::new(new_call_log()).exit_with("compile", 1);
    let result = run_with_runner(&config, runner).await;

    assert_eq!(result.outcome.exit_code(), 1);
    assert!(!result.calls.contains(&"stage".to_string()));
}

/// The failing tool's own exit code is propagated
#[tokio::test]
async fn test_tool_exit_code_propagated() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let runner = MockRunner::new(new_call_log()).exit_with("compile", 101);
    let result = run_with_runner(&config, runner).await;

    assert_eq!(result.outcome.exit_code(), 101);
    let compile = &result.outcome.results[0];
    assert_eq!(compile.exit_code, Some(101));
    assert_eq!(compile.stderr, "wasm-pack failed\n");
}

/// A missing tool has no exit code of its own: generic failure
#[tokio::test]
async fn test_missing_tool_generic_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let runner = MockRunner::new(new_call_log()).without_tool("wasm-pack");
    let result = run_with_runner(&config, runner).await;

    assert_eq!(result.outcome.exit_code(), 1);
}
