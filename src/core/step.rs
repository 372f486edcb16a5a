//! Step domain model

use crate::core::state::StepState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// An external command invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Executable name or path
    pub command: String,

    /// Arguments, in order
    pub arguments: Vec<String>,

    /// Directory the command runs in
    pub working_dir: PathBuf,
}

impl CommandSpec {
    pub fn new(command: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            arguments: Vec::new(),
            working_dir: working_dir.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.arguments.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command)?;
        for arg in &self.arguments {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// What a step does when it runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    /// Run an external command
    Command(CommandSpec),

    /// Copy a directory tree into the output, if it exists
    StageAssets {
        source: PathBuf,
        destination: PathBuf,
    },

    /// Print a message for the user
    Notice {
        lines: Vec<String>,
    },
}

/// A single step in a pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Step name, unique within a pipeline
    pub name: String,

    /// What the step does
    pub kind: StepKind,

    /// Runtime state
    #[serde(skip, default = "pending")]
    pub state: StepState,
}

fn pending() -> StepState {
    StepState::Pending
}

impl Step {
    pub fn command(name: impl Into<String>, spec: CommandSpec) -> Self {
        Self::new(name, StepKind::Command(spec))
    }

    pub fn stage_assets(
        name: impl Into<String>,
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self::new(
            name,
            StepKind::StageAssets {
                source: source.into(),
                destination: destination.into(),
            },
        )
    }

    pub fn notice<I, S>(name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            StepKind::Notice {
                lines: lines.into_iter().map(Into::into).collect(),
            },
        )
    }

    fn new(name: impl Into<String>, kind: StepKind) -> Self {
        Self {
            name: name.into(),
            kind,
            state: StepState::Pending,
        }
    }

    /// Short human-readable description of the step's action
    pub fn describe(&self) -> String {
        match &self.kind {
            StepKind::Command(spec) => format!("{} (in {})", spec, spec.working_dir.display()),
            StepKind::StageAssets { source, destination } => {
                format!("copy {} -> {}", source.display(), destination.display())
            }
            StepKind::Notice { lines } => format!("print {} line(s)", lines.len()),
        }
    }
}

/// Result of running one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// Name of the step that produced this result
    pub step_name: String,

    /// Process exit code, `None` if the process was killed by a signal or
    /// the step is not a process
    pub exit_code: Option<i32>,

    /// Whether the step succeeded
    pub succeeded: bool,

    /// Captured standard error
    pub stderr: String,
}

impl StepResult {
    /// A successful result for a step that is not backed by a process
    pub fn success(step_name: impl Into<String>) -> Self {
        Self {
            step_name: step_name.into(),
            exit_code: None,
            succeeded: true,
            stderr: String::new(),
        }
    }

    /// A failed result for a step that never produced an exit status
    pub fn failure(step_name: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            step_name: step_name.into(),
            exit_code: None,
            succeeded: false,
            stderr: stderr.into(),
        }
    }
}
