//! Progress notification port
//!
//! Defines the interface for reporting progress during a coordinator run.

use conductor_domain::{AgentPlan, CoordinatorResult, PlanStep, StepExecutionRecord};

/// Callback for progress updates during a coordinator run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait CoordinatorProgress: Send + Sync {
    /// Called once the planner has produced the plan
    fn on_plan_ready(&self, _plan: &AgentPlan) {}

    /// Called before a step is dispatched
    fn on_step_start(&self, _step: &PlanStep, _index: usize, _total: usize) {}

    /// Called after a step produced its record
    fn on_step_complete(&self, _record: &StepExecutionRecord) {}

    /// Called when the run returns a result
    fn on_run_complete(&self, _result: &CoordinatorResult) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl CoordinatorProgress for NoProgress {}
