//! Orchestration entities

use super::value_objects::{RunStatus, StepOutput};
use crate::agent::{ActionOutcome, AgentActionResult, AgentKind, AgentReport};
use crate::plan::AgentPlan;
use serde::{Deserialize, Serialize};

/// Audit entry for one dispatched step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepExecutionRecord {
    pub assignee: AgentKind,
    #[serde(flatten)]
    pub result: AgentActionResult<StepOutput>,
}

impl StepExecutionRecord {
    pub fn new(assignee: AgentKind, result: AgentActionResult<StepOutput>) -> Self {
        Self { assignee, result }
    }

    /// No-op record for a step assigned to the planner.
    pub fn planner_ack(step_id: impl Into<String>) -> Self {
        Self::new(
            AgentKind::Planner,
            AgentActionResult::success(step_id, "Planner step acknowledged"),
        )
    }

    pub fn step_id(&self) -> &str {
        &self.result.step_id
    }

    pub fn outcome(&self) -> ActionOutcome {
        self.result.outcome
    }

    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }

    pub fn output(&self) -> Option<&StepOutput> {
        self.result.output.as_ref()
    }
}

/// Final outcome of one coordinator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorResult {
    pub plan: AgentPlan,
    pub status: RunStatus,
    pub steps: Vec<StepExecutionRecord>,
    /// One report per worker, in planner, coder, reviewer, executor order
    pub reports: Vec<AgentReport>,
}

impl CoordinatorResult {
    /// Build a result whose status follows the recorded step outcomes.
    pub fn new(plan: AgentPlan, steps: Vec<StepExecutionRecord>, reports: Vec<AgentReport>) -> Self {
        let status = if steps.iter().all(|s| s.is_success()) {
            RunStatus::Completed
        } else {
            RunStatus::Failed
        };
        Self {
            plan,
            status,
            steps,
            reports,
        }
    }

    pub fn with_status(mut self, status: RunStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    pub fn step(&self, step_id: &str) -> Option<&StepExecutionRecord> {
        self.steps.iter().find(|s| s.step_id() == step_id)
    }

    pub fn report(&self, agent: AgentKind) -> Option<&AgentReport> {
        self.reports.iter().find(|r| r.agent == agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coding::CoderOutput;
    use crate::plan::PlanDraft;
    use crate::task::Task;

    fn plan() -> AgentPlan {
        let task = Task::new("t-1", "goal");
        PlanDraft::fallback(&task).into_plan(task, "mock")
    }

    #[test]
    fn test_status_follows_outcomes() {
        let ok = StepExecutionRecord::planner_ack("a");
        let failed = StepExecutionRecord::new(AgentKind::Coder, AgentActionResult::failed("b", "no"));

        assert!(CoordinatorResult::new(plan(), vec![ok.clone()], vec![]).is_completed());
        assert_eq!(
            CoordinatorResult::new(plan(), vec![ok, failed], vec![]).status,
            RunStatus::Failed
        );
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = StepExecutionRecord::new(
            AgentKind::Coder,
            AgentActionResult::success("s-1", "ok").with_output(StepOutput::Coder(CoderOutput::manual_intervention())),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["assignee"], "coder");
        assert_eq!(json["step_id"], "s-1");
        assert_eq!(json["output"]["role"], "coder");
    }

    #[test]
    fn test_record_deserializes_with_and_without_output() {
        let record = StepExecutionRecord::new(
            AgentKind::Coder,
            AgentActionResult::success("s-1", "ok").with_output(StepOutput::Coder(CoderOutput::manual_intervention())),
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: StepExecutionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);

        let ack = StepExecutionRecord::planner_ack("s-0");
        let json = serde_json::to_value(&ack).unwrap();
        assert!(json.get("output").is_none());
        let back: StepExecutionRecord = serde_json::from_value(json).unwrap();
        assert!(back.output().is_none());
        assert_eq!(back.step_id(), "s-0");
    }

    #[test]
    fn test_report_lookup() {
        let result = CoordinatorResult::new(
            plan(),
            vec![],
            vec![AgentReport::empty(AgentKind::Planner), AgentReport::empty(AgentKind::Executor)],
        );
        assert!(result.report(AgentKind::Executor).is_some());
        assert!(result.report(AgentKind::Coder).is_none());
    }
}
