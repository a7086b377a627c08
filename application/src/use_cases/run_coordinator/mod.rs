//! Run Coordinator use case
//!
//! Drives a task through the planner, then dispatches every plan step in
//! list order to the worker named by its assignee. The run stops at the
//! first unsuccessful step (or unapproved review) and reports `failed`.

mod context;
mod types;

pub use types::{CandidateSelection, CoordinatorRunOptions, ExecutorOverrides, RunCoordinatorError};

use crate::agents::{Agent, AgentOptions};
use crate::ports::progress::{CoordinatorProgress, NoProgress};
use crate::use_cases::shared::check_cancelled;
use conductor_domain::{
    AgentKind, AgentPlan, AgentReport, Assignee, CoderOutput, CoordinatorResult, ExecutionResult,
    PlanStep, ReviewerOutput, StepExecutionRecord, StepOutput, Task,
};
use context::RunContext;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub type PlannerWorker = Arc<dyn Agent<Output = ()>>;
pub type CoderWorker = Arc<dyn Agent<Output = CoderOutput>>;
pub type ReviewerWorker = Arc<dyn Agent<Output = ReviewerOutput>>;
pub type ExecutorWorker = Arc<dyn Agent<Output = ExecutionResult>>;

/// What the loop should do after a step was recorded
enum Flow {
    Continue,
    Stop,
}

/// Use case for running the planner → worker pipeline
pub struct RunCoordinatorUseCase {
    planner: PlannerWorker,
    coder: CoderWorker,
    reviewer: ReviewerWorker,
    executor: ExecutorWorker,
}

impl RunCoordinatorUseCase {
    pub fn new(
        planner: PlannerWorker,
        coder: CoderWorker,
        reviewer: ReviewerWorker,
        executor: ExecutorWorker,
    ) -> Self {
        Self {
            planner,
            coder,
            reviewer,
            executor,
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn run(
        &self,
        task: &Task,
        options: &CoordinatorRunOptions,
    ) -> Result<CoordinatorResult, RunCoordinatorError> {
        self.run_with_progress(task, options, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn run_with_progress(
        &self,
        task: &Task,
        options: &CoordinatorRunOptions,
        progress: &dyn CoordinatorProgress,
    ) -> Result<CoordinatorResult, RunCoordinatorError> {
        check_cancelled(&options.cancellation)?;

        let agent_options = AgentOptions {
            dry_run: options.dry_run,
            ..AgentOptions::default()
        };
        let mut ctx = RunContext::default();

        info!(task_id = %task.id, goal = %task.goal, "Starting coordinator run");
        let planned = self.planner.plan(task, &agent_options).await?;
        ctx.record_report(planned.report);
        let plan = planned.plan;
        progress.on_plan_ready(&plan);

        let total = plan.steps.len();
        let mut records = Vec::with_capacity(total);

        for (index, step) in plan.steps.iter().enumerate() {
            check_cancelled(&options.cancellation)?;
            progress.on_step_start(step, index, total);
            debug!(step_id = %step.id, assignee = %step.assignee, "Dispatching step");

            let (record, flow) = self
                .dispatch(&plan, step, &agent_options, options, &mut ctx)
                .await?;
            progress.on_step_complete(&record);
            records.push(record);

            if let Flow::Stop = flow {
                warn!(step_id = %step.id, "Stopping run after unsuccessful step");
                break;
            }
        }

        let result = CoordinatorResult::new(plan, records, self.collect_reports(&ctx));
        info!(
            task_id = %task.id,
            status = %result.status,
            steps = result.steps.len(),
            "Coordinator run finished"
        );
        progress.on_run_complete(&result);
        Ok(result)
    }

    async fn dispatch(
        &self,
        plan: &AgentPlan,
        step: &PlanStep,
        agent_options: &AgentOptions,
        options: &CoordinatorRunOptions,
        ctx: &mut RunContext,
    ) -> Result<(StepExecutionRecord, Flow), RunCoordinatorError> {
        let kind = match &step.assignee {
            Assignee::Agent(kind) => *kind,
            Assignee::Unsupported(raw) => {
                return Err(RunCoordinatorError::UnsupportedAssignee {
                    step_id: step.id.clone(),
                    assignee: raw.clone(),
                });
            }
        };

        match kind {
            AgentKind::Planner => Ok((StepExecutionRecord::planner_ack(&step.id), Flow::Continue)),

            AgentKind::Coder => {
                let acted = self.coder.act(plan, step, agent_options).await?;
                ctx.record_report(acted.report);
                if let Some(output) = &acted.result.output {
                    ctx.record_coder_output(&step.id, output.clone());
                }
                let flow = flow_for(acted.result.is_success());
                let record = StepExecutionRecord::new(kind, acted.result.map_output(StepOutput::Coder));
                Ok((record, flow))
            }

            AgentKind::Reviewer => {
                let candidate = ctx
                    .candidate_for(step, options.candidate_selection)
                    .cloned()
                    .ok_or_else(|| RunCoordinatorError::MissingCoderOutput {
                        step_id: step.id.clone(),
                    })?;
                let reviewer_options = agent_options.clone().with_candidate(candidate);
                let acted = self.reviewer.act(plan, step, &reviewer_options).await?;
                ctx.record_report(acted.report);
                let approved = acted.result.output.as_ref().is_some_and(|o| o.approved);
                let flow = flow_for(acted.result.is_success() && approved);
                let record =
                    StepExecutionRecord::new(kind, acted.result.map_output(StepOutput::Reviewer));
                Ok((record, flow))
            }

            AgentKind::Executor => {
                let mut executor_options = agent_options.clone();
                executor_options.payload = options.overrides.payload_for(&step.id).cloned();
                let acted = self.executor.act(plan, step, &executor_options).await?;
                ctx.record_report(acted.report);
                let flow = flow_for(acted.result.is_success());
                let record =
                    StepExecutionRecord::new(kind, acted.result.map_output(StepOutput::Executor));
                Ok((record, flow))
            }
        }
    }

    /// One report per worker: this run's if the worker was reached, else its own.
    fn collect_reports(&self, ctx: &RunContext) -> Vec<AgentReport> {
        AgentKind::ALL
            .iter()
            .map(|kind| {
                ctx.report(*kind)
                    .cloned()
                    .unwrap_or_else(|| self.worker_report(*kind))
            })
            .collect()
    }

    fn worker_report(&self, kind: AgentKind) -> AgentReport {
        match kind {
            AgentKind::Planner => self.planner.report(),
            AgentKind::Coder => self.coder.report(),
            AgentKind::Reviewer => self.reviewer.report(),
            AgentKind::Executor => self.executor.report(),
        }
    }
}

fn flow_for(success: bool) -> Flow {
    if success { Flow::Continue } else { Flow::Stop }
}
