//! Plan entities

use crate::agent::Assignee;
use crate::task::{Severity, Task};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form parameters a planner can attach to a step.
///
/// The executor reads `request`, `context`, `positions` and `mode` from here
/// when no explicit payload is supplied.
pub type StepParameters = serde_json::Map<String, serde_json::Value>;

/// Descriptive status of a plan step.
///
/// The coordinator never mutates it; it records what the planner declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Planning,
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl StepStatus {
    pub fn as_str(&self) -> &str {
        match self {
            StepStatus::Planning => "planning",
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in_progress",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One unit of work in a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub id: String,
    pub title: String,
    pub description: String,
    pub assignee: Assignee,
    #[serde(default)]
    pub status: StepStatus,
    /// Ids of steps this one builds on. Informational; execution follows list order.
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub acceptance: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<StepParameters>,
}

impl PlanStep {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        assignee: impl Into<Assignee>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            assignee: assignee.into(),
            status: StepStatus::Planning,
            dependencies: Vec::new(),
            acceptance: Vec::new(),
            metrics: None,
            parameters: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_dependency(mut self, step_id: impl Into<String>) -> Self {
        self.dependencies.push(step_id.into());
        self
    }

    pub fn with_acceptance(mut self, criterion: impl Into<String>) -> Self {
        self.acceptance.push(criterion.into());
        self
    }

    pub fn with_parameters(mut self, parameters: StepParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn parameter(&self, key: &str) -> Option<&serde_json::Value> {
        self.parameters.as_ref().and_then(|p| p.get(key))
    }
}

/// A risk the planner declared for the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRisk {
    pub id: String,
    pub description: String,
    pub mitigation: String,
    pub owner: Assignee,
    pub severity: Severity,
}

/// A success metric the planner declared for the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanMetric {
    pub id: String,
    pub label: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// The planner's output for one run. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPlan {
    pub plan_id: String,
    pub task: Task,
    pub steps: Vec<PlanStep>,
    #[serde(default)]
    pub risks: Vec<PlanRisk>,
    #[serde(default)]
    pub metrics: Vec<PlanMetric>,
    /// Provider id that produced the plan
    pub model: String,
    pub created_at: DateTime<Utc>,
}

impl AgentPlan {
    pub fn step(&self, step_id: &str) -> Option<&PlanStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    /// Steps that appear before `step_id` in list order.
    pub fn previous_steps(&self, step_id: &str) -> &[PlanStep] {
        match self.steps.iter().position(|s| s.id == step_id) {
            Some(index) => &self.steps[..index],
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentKind;

    fn plan_with(steps: Vec<PlanStep>) -> AgentPlan {
        AgentPlan {
            plan_id: "p-1".to_string(),
            task: Task::new("t-1", "goal"),
            steps,
            risks: vec![],
            metrics: vec![],
            model: "mock".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_previous_steps() {
        let plan = plan_with(vec![
            PlanStep::new("a", "A", AgentKind::Planner),
            PlanStep::new("b", "B", AgentKind::Coder),
            PlanStep::new("c", "C", AgentKind::Reviewer),
        ]);
        let prev: Vec<_> = plan.previous_steps("c").iter().map(|s| s.id.as_str()).collect();
        assert_eq!(prev, vec!["a", "b"]);
        assert!(plan.previous_steps("missing").is_empty());
    }

    #[test]
    fn test_step_parameter_lookup() {
        let mut params = StepParameters::new();
        params.insert("mode".to_string(), serde_json::json!("simulate"));
        let step = PlanStep::new("x", "X", AgentKind::Executor).with_parameters(params);
        assert_eq!(step.parameter("mode").unwrap(), "simulate");
        assert!(step.parameter("request").is_none());
    }

    #[test]
    fn test_step_status_serde() {
        let json = serde_json::to_string(&StepStatus::InProgress).unwrap();
        assert_eq!(json, r#""in_progress""#);
    }
}
