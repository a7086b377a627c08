//! Plan parsing from model output
//!
//! Model text is read into a [`PlanDraft`] (steps, risks and metrics with
//! ids filled in). Anything that fails to parse, or parses to a plan with no
//! steps, comes back as [`ParseOutcome::Malformed`] so the planner can swap in
//! [`PlanDraft::fallback`].

use super::entities::{AgentPlan, PlanMetric, PlanRisk, PlanStep, StepParameters, StepStatus};
use crate::agent::{AgentKind, Assignee};
use crate::core::parse::{ParseOutcome, parse_json_response};
use crate::task::{Severity, Task};
use chrono::Utc;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct RawPlan {
    #[serde(default)]
    steps: Vec<RawStep>,
    #[serde(default)]
    risks: Vec<RawRisk>,
    #[serde(default)]
    metrics: Vec<RawMetric>,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    id: Option<String>,
    title: String,
    #[serde(default)]
    description: String,
    assignee: Assignee,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    acceptance: Vec<String>,
    metrics: Option<BTreeMap<String, f64>>,
    parameters: Option<StepParameters>,
}

#[derive(Debug, Deserialize)]
struct RawRisk {
    id: Option<String>,
    description: String,
    #[serde(default)]
    mitigation: String,
    owner: Assignee,
    #[serde(default)]
    severity: Severity,
}

#[derive(Debug, Deserialize)]
struct RawMetric {
    id: Option<String>,
    label: String,
    target: String,
    unit: Option<String>,
}

/// Steps, risks and metrics read from a model response, ids resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanDraft {
    pub steps: Vec<PlanStep>,
    pub risks: Vec<PlanRisk>,
    pub metrics: Vec<PlanMetric>,
}

impl PlanDraft {
    /// Deterministic one-step plan used when the model output is unusable.
    pub fn fallback(task: &Task) -> Self {
        let task_id = task.id.as_str();
        Self {
            steps: vec![
                PlanStep::new(
                    format!("{task_id}-step-1"),
                    "Clarify task context",
                    AgentKind::Planner,
                )
                .with_description("Gather missing information before continuing.")
                .with_acceptance("Context documented"),
            ],
            risks: vec![PlanRisk {
                id: format!("{task_id}-risk-1"),
                description: "Completion router returned invalid JSON".to_string(),
                mitigation: "Fallback to default template".to_string(),
                owner: AgentKind::Planner.into(),
                severity: Severity::Medium,
            }],
            metrics: vec![PlanMetric {
                id: format!("{task_id}-metric-1"),
                label: "FallbackUsed".to_string(),
                target: "true".to_string(),
                unit: Some("boolean".to_string()),
            }],
        }
    }

    /// Freeze the draft into a plan for `task`, produced by provider `model`.
    pub fn into_plan(self, task: Task, model: impl Into<String>) -> AgentPlan {
        AgentPlan {
            plan_id: uuid::Uuid::new_v4().to_string(),
            task,
            steps: self.steps,
            risks: self.risks,
            metrics: self.metrics,
            model: model.into(),
            created_at: Utc::now(),
        }
    }
}

/// Parse a planner response for `task`.
///
/// Missing ids are synthesized as `{task_id}-step-{n}`, `{task_id}-risk-{n}`
/// and `{task_id}-metric-{n}` (1-indexed).
pub fn parse_plan_response(task: &Task, response: &str) -> ParseOutcome<PlanDraft> {
    let raw = match parse_json_response::<RawPlan>(response) {
        ParseOutcome::Parsed(raw) => raw,
        ParseOutcome::Malformed { raw, error } => return ParseOutcome::Malformed { raw, error },
    };

    if raw.steps.is_empty() {
        return ParseOutcome::malformed(response, "plan contains no steps");
    }

    let task_id = task.id.as_str();
    let steps = raw
        .steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| PlanStep {
            id: step.id.unwrap_or_else(|| format!("{task_id}-step-{}", index + 1)),
            title: step.title,
            description: step.description,
            assignee: step.assignee,
            status: StepStatus::Planning,
            dependencies: step.dependencies,
            acceptance: step.acceptance,
            metrics: step.metrics,
            parameters: step.parameters,
        })
        .collect();

    let risks = raw
        .risks
        .into_iter()
        .enumerate()
        .map(|(index, risk)| PlanRisk {
            id: risk.id.unwrap_or_else(|| format!("{task_id}-risk-{}", index + 1)),
            description: risk.description,
            mitigation: risk.mitigation,
            owner: risk.owner,
            severity: risk.severity,
        })
        .collect();

    let metrics = raw
        .metrics
        .into_iter()
        .enumerate()
        .map(|(index, metric)| PlanMetric {
            id: metric.id.unwrap_or_else(|| format!("{task_id}-metric-{}", index + 1)),
            label: metric.label,
            target: metric.target,
            unit: metric.unit,
        })
        .collect();

    ParseOutcome::Parsed(PlanDraft {
        steps,
        risks,
        metrics,
    })
}
