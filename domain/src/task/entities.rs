//! Task entity

use super::value_objects::{Priority, Severity, TaskId};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A caller's high-level request, immutable for the duration of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// What the caller wants achieved
    pub goal: String,
    /// Optional free-form elaboration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// Caller-declared risk of the task
    #[serde(default)]
    pub risk: Severity,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, goal: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            goal: goal.into(),
            description: None,
            priority: Priority::default(),
            risk: Severity::default(),
            tags: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_risk(mut self, risk: Severity) -> Self {
        self.risk = risk;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Reject tasks that cannot be planned at all.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.goal.trim().is_empty() {
            return Err(DomainError::InvalidTask("goal cannot be empty".to_string()));
        }
        if self.id.as_str().trim().is_empty() {
            return Err(DomainError::InvalidTask("id cannot be empty".to_string()));
        }
        Ok(())
    }
}
