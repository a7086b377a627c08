//! Planner worker
//!
//! Turns a task into an [`AgentPlan`]. Unusable model output never fails
//! the call: the deterministic fallback plan is used instead.

use super::contract::{Acted, Agent, AgentError, AgentOptions, Planned, ReportSlot};
use crate::config::AgentParams;
use crate::ports::agent_metrics::AgentMetrics;
use crate::ports::completion_gateway::CompletionGateway;
use async_trait::async_trait;
use conductor_domain::{
    AgentKind, AgentPlan, AgentPromptTemplate, AgentReport, ParseOutcome, PlanDraft, PlanStep,
    RouteCompletionParams, RoutingPurpose, Task, clip_for_log, parse_plan_response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

const RAW_LOG_LIMIT: usize = 512;

pub struct PlannerAgent {
    gateway: Arc<dyn CompletionGateway>,
    params: AgentParams,
    metrics: Arc<dyn AgentMetrics>,
    last_report: ReportSlot,
}

impl PlannerAgent {
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        params: AgentParams,
        metrics: Arc<dyn AgentMetrics>,
    ) -> Self {
        Self {
            gateway,
            params,
            metrics,
            last_report: ReportSlot::new(AgentKind::Planner),
        }
    }
}

#[async_trait]
impl Agent for PlannerAgent {
    type Output = ();

    fn kind(&self) -> AgentKind {
        AgentKind::Planner
    }

    async fn plan(&self, task: &Task, options: &AgentOptions) -> Result<Planned, AgentError> {
        let started = Instant::now();
        let correlation_id = options
            .correlation_id
            .clone()
            .unwrap_or_else(|| task.id.to_string());

        let params = RouteCompletionParams::new(
            RoutingPurpose::Planning,
            AgentPromptTemplate::planning(task, self.params.prompt_override.as_deref()),
        )
        .with_temperature(self.params.temperature)
        .with_max_tokens(self.params.max_tokens)
        .with_correlation_id(correlation_id.clone());

        let completion = self.gateway.complete(params).await?;

        let (draft, fallback_used) = match parse_plan_response(task, &completion.text) {
            ParseOutcome::Parsed(draft) => (draft, false),
            ParseOutcome::Malformed { raw, error } => {
                warn!(
                    task_id = %task.id,
                    provider = %completion.provider,
                    error = %error,
                    raw = %clip_for_log(&raw, RAW_LOG_LIMIT),
                    "Planner received an unusable response, building fallback plan"
                );
                (PlanDraft::fallback(task), true)
            }
        };

        let plan = draft.into_plan(task.clone(), completion.provider.clone());
        self.metrics
            .record_latency(AgentKind::Planner, "plan", started.elapsed());

        let mut report = AgentReport::empty(AgentKind::Planner)
            .with_summary(format!("Plan generated with {} steps", plan.steps.len()))
            .with_stat("steps", plan.steps.len() as f64)
            .with_stat("risks", plan.risks.len() as f64)
            .with_stat("metrics", plan.metrics.len() as f64)
            .with_metadata("provider", completion.provider.clone())
            .with_metadata("latencyMs", completion.latency_ms)
            .with_metadata("correlationId", correlation_id);
        if fallback_used {
            report = report.with_issue("Model returned an unusable plan; fallback plan used");
        }
        self.last_report.set(report.clone());

        info!(
            task_id = %task.id,
            plan_id = %plan.plan_id,
            steps = plan.steps.len(),
            provider = %plan.model,
            "Plan ready"
        );

        Ok(Planned { plan, report })
    }

    async fn act(
        &self,
        _plan: &AgentPlan,
        _step: &PlanStep,
        _options: &AgentOptions,
    ) -> Result<Acted<()>, AgentError> {
        Err(AgentError::UnsupportedOperation {
            agent: self.name(),
            operation: "act",
        })
    }

    fn report(&self) -> AgentReport {
        self.last_report.get()
    }
}
