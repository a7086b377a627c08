//! Coder worker
//!
//! Proposes file changes for one plan step. A response that cannot be read
//! still yields a successful action whose payload asks for manual work.

use super::contract::{Acted, Agent, AgentError, AgentOptions, ReportSlot};
use crate::config::AgentParams;
use crate::ports::agent_metrics::AgentMetrics;
use crate::ports::completion_gateway::CompletionGateway;
use async_trait::async_trait;
use chrono::Utc;
use conductor_domain::{
    AgentActionResult, AgentKind, AgentPlan, AgentPromptTemplate, AgentReport, CoderOutput,
    ParseOutcome, PlanStep, RouteCompletionParams, RoutingPurpose, clip_for_log,
    parse_coder_response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

pub struct CoderAgent {
    gateway: Arc<dyn CompletionGateway>,
    params: AgentParams,
    metrics: Arc<dyn AgentMetrics>,
    last_report: ReportSlot,
}

impl CoderAgent {
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        params: AgentParams,
        metrics: Arc<dyn AgentMetrics>,
    ) -> Self {
        Self {
            gateway,
            params,
            metrics,
            last_report: ReportSlot::new(AgentKind::Coder),
        }
    }
}

#[async_trait]
impl Agent for CoderAgent {
    type Output = CoderOutput;

    fn kind(&self) -> AgentKind {
        AgentKind::Coder
    }

    async fn act(
        &self,
        plan: &AgentPlan,
        step: &PlanStep,
        options: &AgentOptions,
    ) -> Result<Acted<CoderOutput>, AgentError> {
        let started_at = Utc::now();
        let started = Instant::now();
        let correlation_id = options
            .correlation_id
            .clone()
            .unwrap_or_else(|| format!("{}:{}", plan.plan_id, step.id));

        let params = RouteCompletionParams::new(
            RoutingPurpose::Coding,
            AgentPromptTemplate::coding(plan, step),
        )
        .with_temperature(self.params.temperature)
        .with_max_tokens(self.params.max_tokens)
        .with_correlation_id(correlation_id);

        let completion = self.gateway.complete(params).await?;

        let (output, malformed) = match parse_coder_response(&completion.text) {
            ParseOutcome::Parsed(output) => (output, false),
            ParseOutcome::Malformed { raw, error } => {
                error!(
                    plan_id = %plan.plan_id,
                    step_id = %step.id,
                    error = %error,
                    raw = %clip_for_log(&raw, 512),
                    "Coder failed to parse model response"
                );
                (CoderOutput::manual_intervention(), true)
            }
        };

        self.metrics
            .record_latency(AgentKind::Coder, "act", started.elapsed());
        self.metrics
            .increment(AgentKind::Coder, "code_suggestions", &[]);

        let mut report = AgentReport::empty(AgentKind::Coder)
            .with_summary(output.summary.clone())
            .with_stat("files", output.files.len() as f64)
            .with_metadata("provider", completion.provider.clone());
        if malformed {
            report = report.with_issue(format!("Step {}: model response was not valid JSON", step.id));
        }
        self.last_report.set(report.clone());

        let result = AgentActionResult::success(&step.id, "Code suggestions generated")
            .with_artifact("provider", completion.provider)
            .with_artifact("tests", output.tests.clone())
            .with_timing(started_at, Utc::now())
            .with_output(output);

        Ok(Acted { result, report })
    }

    fn report(&self) -> AgentReport {
        self.last_report.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedGateway, TrackingMetrics};
    use conductor_domain::{ActionOutcome, AgentObservation, FileAction, PlanDraft, Task};

    fn plan_and_step() -> (AgentPlan, PlanStep) {
        let task = Task::new("t-1", "add logging");
        let mut plan = PlanDraft::fallback(&task).into_plan(task, "mock");
        let step = PlanStep::new("t-1-step-2", "Implement", AgentKind::Coder);
        plan.steps.push(step.clone());
        (plan, step)
    }

    #[tokio::test]
    async fn test_observe_only_logs() {
        let gateway = Arc::new(ScriptedGateway::texts(&[]));
        let metrics = Arc::new(TrackingMetrics::default());
        let agent = CoderAgent::new(gateway.clone(), AgentParams::coder(), metrics.clone());
        let before = agent.report();

        let observation = AgentObservation::new("reviewer", "tests missing for src/log.rs")
            .with_data(serde_json::json!({"path": "src/log.rs"}));
        agent.observe(&observation).await;

        assert_eq!(agent.report(), before);
        assert!(agent.report().is_empty());
        assert!(gateway.requests().is_empty());
        assert!(metrics.counters().is_empty());
    }

    #[tokio::test]
    async fn test_act_parses_changes() {
        let gateway = Arc::new(ScriptedGateway::texts(&[r#"{
            "files": [{"path": "src/log.rs", "action": "create", "language": "rust", "content": "//"}],
            "tests": ["cargo test"],
            "summary": "Add logger"
        }"#]));
        let metrics = Arc::new(TrackingMetrics::default());
        let agent = CoderAgent::new(gateway.clone(), AgentParams::coder(), metrics.clone());
        let (plan, step) = plan_and_step();

        let acted = agent.act(&plan, &step, &AgentOptions::default()).await.unwrap();

        let output = acted.result.output.as_ref().unwrap();
        assert_eq!(output.files[0].action, FileAction::Create);
        assert_eq!(acted.result.outcome, ActionOutcome::Success);
        assert_eq!(acted.result.artifacts["provider"], "scripted");
        assert_eq!(acted.result.artifacts["tests"][0], "cargo test");
        assert_eq!(acted.report.summaries, vec!["Add logger"]);
        assert_eq!(acted.report.stats["files"], 1.0);
        assert_eq!(metrics.counters(), vec![(AgentKind::Coder, "code_suggestions".to_string())]);

        let request = &gateway.requests()[0];
        assert_eq!(request.purpose, RoutingPurpose::Coding);
        assert_eq!(request.temperature, Some(0.1));
        assert_eq!(request.max_tokens, Some(1600));
        assert_eq!(
            request.correlation_id.as_deref(),
            Some(format!("{}:t-1-step-2", plan.plan_id).as_str())
        );
    }

    #[tokio::test]
    async fn test_act_absorbs_malformed_response() {
        let gateway = Arc::new(ScriptedGateway::texts(&["not json"]));
        let metrics = Arc::new(TrackingMetrics::default());
        let agent = CoderAgent::new(gateway, AgentParams::coder(), metrics.clone());
        let (plan, step) = plan_and_step();

        let acted = agent.act(&plan, &step, &AgentOptions::default()).await.unwrap();

        assert!(acted.result.is_success());
        let output = acted.result.output.unwrap();
        assert!(output.files.is_empty());
        assert_eq!(output.summary, CoderOutput::MANUAL_INTERVENTION);
        assert_eq!(acted.report.issues.len(), 1);
        assert_eq!(metrics.counters().len(), 1);
    }

    #[tokio::test]
    async fn test_coder_cannot_plan() {
        let agent = CoderAgent::new(
            Arc::new(ScriptedGateway::texts(&[])),
            AgentParams::coder(),
            Arc::new(TrackingMetrics::default()),
        );
        let result = agent.plan(&Task::new("t", "g"), &AgentOptions::default()).await;
        assert!(matches!(
            result,
            Err(AgentError::UnsupportedOperation { operation: "plan", .. })
        ));
    }
}
