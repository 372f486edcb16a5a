//! Test utility functions for wasm-pipeline

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use wasm_pipeline::core::config::BuildConfig;
use wasm_pipeline::{
    AssetStager, CommandSpec, ExecutionEngine, ExecutionStatus, FsAssetStager, Pipeline,
    PipelineOutcome, RunnerError, StageError, StageReport, StepResult, StepRunner, StepState,
};

/// Shared record of which collaborator was invoked, in order
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn new_call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Mock runner that returns a predefined exit code per step name
///
/// Steps without a configured code exit 0. Each call is appended to the
/// shared log as `run:<step>`.
pub struct MockRunner {
    exit_codes: HashMap<String, i32>,
    missing_tools: Vec<String>,
    log: CallLog,
}

impl MockRunner {
    pub fn new(log: CallLog) -> Self {
        Self {
            exit_codes: HashMap::new(),
            missing_tools: Vec::new(),
            log,
        }
    }

    /// Make the named step exit with `code`
    pub fn exit_with(mut self, step_name: &str, code: i32) -> Self {
        self.exit_codes.insert(step_name.to_string(), code);
        self
    }

    /// Pretend the given executable is not installed
    pub fn without_tool(mut self, program: &str) -> Self {
        self.missing_tools.push(program.to_string());
        self
    }
}

#[async_trait]
impl StepRunner for MockRunner {
    async fn run(&self, step_name: &str, spec: &CommandSpec) -> Result<StepResult, RunnerError> {
        self.log.lock().unwrap().push(format!("run:{}", step_name));

        if self.missing_tools.contains(&spec.command) {
            return Err(RunnerError::Spawn {
                program: spec.command.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }

        let code = self.exit_codes.get(step_name).copied().unwrap_or(0);
        Ok(StepResult {
            step_name: step_name.to_string(),
            exit_code: Some(code),
            succeeded: code == 0,
            stderr: if code == 0 {
                String::new()
            } else {
                format!("{} failed\n", spec.command)
            },
        })
    }
}

/// Stager that records each call and delegates to the real filesystem stager
pub struct RecordingStager {
    inner: FsAssetStager,
    log: CallLog,
}

impl RecordingStager {
    pub fn new(log: CallLog) -> Self {
        Self {
            inner: FsAssetStager::new(),
            log,
        }
    }
}

#[async_trait]
impl AssetStager for RecordingStager {
    async fn stage(&self, source: &Path, destination: &Path) -> Result<StageReport, StageError> {
        self.log.lock().unwrap().push("stage".to_string());
        self.inner.stage(source, destination).await
    }
}

/// Test result from running a pipeline
#[derive(Debug)]
pub struct PipelineTestResult {
    pub pipeline: Pipeline,
    pub outcome: PipelineOutcome,
    pub calls: Vec<String>,
}

impl PipelineTestResult {
    /// Check if the pipeline completed successfully
    pub fn is_success(&self) -> bool {
        self.outcome.success && matches!(self.pipeline.state.status, ExecutionStatus::Succeeded)
    }

    /// Get the state of a specific step
    pub fn step_state(&self, step_name: &str) -> &StepState {
        &self
            .pipeline
            .step(step_name)
            .unwrap_or_else(|| panic!("Step '{}' not found in result", step_name))
            .state
    }
}

/// A build configuration rooted at `crate_dir` with a fixed name
pub fn config_in(crate_dir: &Path) -> BuildConfig {
    BuildConfig {
        name: Some("test-game".to_string()),
        crate_dir: crate_dir.to_path_buf(),
        ..BuildConfig::default()
    }
}

/// Run the pipeline planned from `config` with the given mock runner
pub async fn run_with_runner(config: &BuildConfig, runner: MockRunner) -> PipelineTestResult {
    let log = runner.log.clone();
    let stager = RecordingStager::new(log.clone());
    let mut pipeline = config.to_pipeline();

    let engine = ExecutionEngine::new(runner, stager);
    let outcome = engine.execute(&mut pipeline).await;
    let calls = log.lock().unwrap().clone();

    PipelineTestResult {
        pipeline,
        outcome,
        calls,
    }
}

/// Run the pipeline planned from `config` with a runner where every step
/// succeeds
pub async fn run_successfully(config: &BuildConfig) -> PipelineTestResult {
    run_with_runner(config, MockRunner::new(new_call_log())).await
}

/// Write `contents` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// All files under `root`, as sorted relative paths with their contents
pub fn snapshot(root: &Path) -> Vec<(String, Vec<u8>)> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<(String, Vec<u8>)>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let relative = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
                out.push((relative, std::fs::read(&path).unwrap()));
            }
        }
    }

    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}

/// Assert pipeline completed successfully
pub fn assert_pipeline_succeeded(result: &PipelineTestResult) {
    assert!(
        result.is_success(),
        "Pipeline should have succeeded, but was {:?} with failure {:?}",
        result.pipeline.state.status,
        result.outcome.failure
    );
}

/// Assert pipeline failed
pub fn assert_pipeline_failed(result: &PipelineTestResult) {
    assert!(
        !result.outcome.success,
        "Pipeline should have failed, but was {:?}",
        result.pipeline.state.status
    );
}

/// Assert the collaborators were invoked in exactly this order
pub fn assert_calls(result: &PipelineTestResult, expected: &[&str]) {
    assert_eq!(
        result.calls, expected,
        "Expected calls: {:?}\nActual: {:?}",
        expected, result.calls
    );
}
