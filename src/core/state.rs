//! Execution state models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Overall pipeline execution status
///
/// The executor only ever moves forward: `Pending` → `Running(0)` →
/// `Running(1)` → ... and from any `Running(i)` into exactly one terminal
/// status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Pipeline has not started
    Pending,
    /// Step at the given index is running
    Running(usize),
    /// Every step succeeded
    Succeeded,
    /// Step at the given index failed
    Failed(usize),
    /// Step at the given index was interrupted by the user
    Interrupted(usize),
}

/// State of a single step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StepState {
    /// Step has not run yet
    Pending,
    /// Step is currently running
    Running {
        started_at: DateTime<Utc>,
    },
    /// Step completed successfully
    Succeeded {
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    },
    /// Step failed
    Failed {
        error: String,
        started_at: DateTime<Utc>,
        failed_at: DateTime<Utc>,
    },
    /// Step never ran because an earlier step failed
    Skipped {
        reason: String,
    },
}

/// Overall pipeline state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    /// Unique execution ID
    pub execution_id: Uuid,

    /// Current execution status
    pub status: ExecutionStatus,

    /// When execution started
    pub started_at: Option<DateTime<Utc>>,

    /// When execution finished
    pub completed_at: Option<DateTime<Utc>>,

    /// Total number of steps
    pub total_steps: usize,
}

impl PipelineState {
    /// Create a new pipeline state
    pub fn new() -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            status: ExecutionStatus::Pending,
            started_at: None,
            completed_at: None,
            total_steps: 0,
        }
    }

    /// Mark pipeline as started
    pub fn start(&mut self, total_steps: usize) {
        self.status = ExecutionStatus::Pending;
        self.started_at = Some(Utc::now());
        self.total_steps = total_steps;
    }

    /// Advance to the step at `index`
    pub fn advance(&mut self, index: usize) {
        self.status = ExecutionStatus::Running(index);
    }

    /// Mark pipeline as succeeded
    pub fn succeed(&mut self) {
        self.status = ExecutionStatus::Succeeded;
        self.completed_at = Some(Utc::now());
    }

    /// Mark pipeline as failed at step `index`
    pub fn fail(&mut self, index: usize) {
        self.status = ExecutionStatus::Failed(index);
        self.completed_at = Some(Utc::now());
    }

    /// Mark pipeline as interrupted at step `index`
    pub fn interrupt(&mut self, index: usize) {
        self.status = ExecutionStatus::Interrupted(index);
        self.completed_at = Some(Utc::now());
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new()
    }
}
