//! Prompt templates for the role workers

use crate::coding::CoderOutput;
use crate::plan::{AgentPlan, PlanStep};
use crate::task::Task;
use serde_json::json;

/// Placeholder replaced by the task goal in a planner prompt override.
pub const GOAL_PLACEHOLDER: &str = "{{GOAL}}";

/// Templates for generating worker prompts
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// Planner prompt for a task.
    ///
    /// With an override, the override text is used as-is after substituting
    /// every `{{GOAL}}` with the task goal.
    pub fn planning(task: &Task, prompt_override: Option<&str>) -> String {
        if let Some(template) = prompt_override {
            return template.replace(GOAL_PLACEHOLDER, &task.goal);
        }

        let mut lines = vec![
            "You are the planner of a multi-agent delivery pipeline.".to_string(),
            "Produce a deterministic JSON plan following the schema:".to_string(),
            "{ goal, steps[], risks[], metrics[] }.".to_string(),
            "Each step must include title, description, assignee, dependencies, acceptance.".to_string(),
            "Use ONLY the assignees planner, coder, reviewer, executor.".to_string(),
            "Executor steps may carry parameters { request, context, positions, mode }.".to_string(),
            "Task context:".to_string(),
            format!("goal: {}", task.goal),
            format!("priority: {}", task.priority),
            format!("risk: {}", task.risk),
        ];
        if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(format!("description: {description}"));
        }
        if !task.tags.is_empty() {
            lines.push(format!("tags: {}", task.tags.join(", ")));
        }
        lines.push("Return valid JSON without markdown.".to_string());
        lines.join("\n")
    }

    /// Coder prompt for one step, listing the other steps of the plan.
    pub fn coding(plan: &AgentPlan, step: &PlanStep) -> String {
        let previous_steps: Vec<_> = plan
            .steps
            .iter()
            .filter(|s| s.id != step.id)
            .map(|s| json!({ "id": s.id, "title": s.title, "status": s.status }))
            .collect();
        let context = json!({
            "goal": plan.task.goal,
            "step": Self::step_json(step),
            "previousSteps": previous_steps,
        });

        format!(
            r#"You are the coder of a multi-agent delivery pipeline.
Read the plan and propose minimal changes that respect existing interfaces.
Respond with JSON {{ files[], tests[], summary }}.
Each file entry has path, action (create|update|delete), language and content.
Include the tests that should accompany the change.
Plan:
{}"#,
            Self::pretty(&context)
        )
    }

    /// Reviewer prompt combining the step context and the coder's candidate.
    pub fn review(plan: &AgentPlan, step: &PlanStep, candidate: &CoderOutput) -> String {
        let context = json!({
            "goal": plan.task.goal,
            "step": Self::step_json(step),
        });
        let candidate = serde_json::to_value(candidate).unwrap_or_default();

        format!(
            r#"You are the reviewer of a multi-agent delivery pipeline (security and reliability).
Evaluate the proposed change and return JSON {{ approved, findings[], testsRequired[] }}.
Each finding has type (blocking|warning|info), message and an optional path.
Checklist: types, error handling, security, limits (slippage/LTV), test coverage, logging, secrets.
Plan:
{}
Candidate:
{}"#,
            Self::pretty(&context),
            Self::pretty(&candidate)
        )
    }

    fn step_json(step: &PlanStep) -> serde_json::Value {
        json!({
            "id": step.id,
            "title": step.title,
            "description": step.description,
            "acceptance": step.acceptance,
        })
    }

    fn pretty(value: &serde_json::Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    }
}
