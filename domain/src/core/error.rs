//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown agent kind: {0}")]
    UnknownAgentKind(String),

    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),

    #[error("Unknown priority: {0}")]
    UnknownPriority(String),

    #[error("Unknown execution mode: {0}")]
    UnknownExecutionMode(String),

    #[error("Invalid task: {0}")]
    InvalidTask(String),
}
