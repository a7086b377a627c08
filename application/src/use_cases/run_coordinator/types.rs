//! Types for the coordinator use case.

use crate::agents::AgentError;
use conductor_domain::ExecutorPayload;
use std::collections::HashMap;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Structural errors that abort a run
#[derive(Error, Debug)]
pub enum RunCoordinatorError {
    #[error("Step {step_id} has unsupported assignee \"{assignee}\"")]
    UnsupportedAssignee { step_id: String, assignee: String },

    #[error("Reviewer step {step_id} has no coder output to review")]
    MissingCoderOutput { step_id: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Agent(#[from] AgentError),
}

impl RunCoordinatorError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunCoordinatorError::Cancelled)
    }
}

/// Which coder output a reviewer step receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidateSelection {
    /// The most recent coder output in the run
    #[default]
    Latest,
    /// The latest declared dependency that produced coder output, else the most recent
    DeclaredDependency,
}

/// Caller-supplied executor payloads.
#[derive(Debug, Clone, Default)]
pub struct ExecutorOverrides {
    /// Applies to every executor step without a per-step entry
    pub executor: Option<ExecutorPayload>,
    /// Keyed by step id
    pub by_step: HashMap<String, ExecutorPayload>,
}

impl ExecutorOverrides {
    pub fn payload_for(&self, step_id: &str) -> Option<&ExecutorPayload> {
        self.by_step.get(step_id).or(self.executor.as_ref())
    }
}

/// Options for one coordinator run
#[derive(Debug, Clone, Default)]
pub struct CoordinatorRunOptions {
    pub dry_run: Option<bool>,
    pub cancellation: Option<CancellationToken>,
    pub overrides: ExecutorOverrides,
    pub candidate_selection: CandidateSelection,
}

impl CoordinatorRunOptions {
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = Some(dry_run);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn with_executor_payload(mut self, payload: ExecutorPayload) -> Self {
        self.overrides.executor = Some(payload);
        self
    }

    pub fn with_step_payload(mut self, step_id: impl Into<String>, payload: ExecutorPayload) -> Self {
        self.overrides.by_step.insert(step_id.into(), payload);
        self
    }

    pub fn with_candidate_selection(mut self, selection: CandidateSelection) -> Self {
        self.candidate_selection = selection;
        self
    }
}
