//! Orchestration value objects

use crate::coding::CoderOutput;
use crate::review::ReviewerOutput;
use crate::transaction::ExecutionResult;
use serde::{Deserialize, Serialize};

/// Overall outcome of a coordinator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role-specific payload attached to a step record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum StepOutput {
    Coder(CoderOutput),
    Reviewer(ReviewerOutput),
    Executor(ExecutionResult),
}

impl StepOutput {
    pub fn as_coder(&self) -> Option<&CoderOutput> {
        match self {
            StepOutput::Coder(output) => Some(output),
            _ => None,
        }
    }

    pub fn as_reviewer(&self) -> Option<&ReviewerOutput> {
        match self {
            StepOutput::Reviewer(output) => Some(output),
            _ => None,
        }
    }

    pub fn as_executor(&self) -> Option<&ExecutionResult> {
        match self {
            StepOutput::Executor(output) => Some(output),
            _ => None,
        }
    }
}
