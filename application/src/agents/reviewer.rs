//! Reviewer worker
//!
//! Judges a coder candidate for one step. A missing candidate is a caller
//! error; an unreadable verdict becomes an unapproved review.

use super::contract::{Acted, Agent, AgentError, AgentOptions, ReportSlot};
use crate::config::AgentParams;
use crate::ports::agent_metrics::AgentMetrics;
use crate::ports::completion_gateway::CompletionGateway;
use async_trait::async_trait;
use chrono::Utc;
use conductor_domain::{
    AgentActionResult, AgentKind, AgentPlan, AgentPromptTemplate, AgentReport, ParseOutcome,
    PlanStep, ReviewerOutput, RouteCompletionParams, RoutingPurpose, clip_for_log,
    parse_reviewer_response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

pub struct ReviewerAgent {
    gateway: Arc<dyn CompletionGateway>,
    params: AgentParams,
    metrics: Arc<dyn AgentMetrics>,
    last_report: ReportSlot,
}

impl ReviewerAgent {
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        params: AgentParams,
        metrics: Arc<dyn AgentMetrics>,
    ) -> Self {
        Self {
            gateway,
            params,
            metrics,
            last_report: ReportSlot::new(AgentKind::Reviewer),
        }
    }
}

#[async_trait]
impl Agent for ReviewerAgent {
    type Output = ReviewerOutput;

    fn kind(&self) -> AgentKind {
        AgentKind::Reviewer
    }

    async fn act(
        &self,
        plan: &AgentPlan,
        step: &PlanStep,
        options: &AgentOptions,
    ) -> Result<Acted<ReviewerOutput>, AgentError> {
        let candidate = options
            .candidate
            .as_ref()
            .ok_or_else(|| AgentError::MissingCandidate {
                step_id: step.id.clone(),
            })?;

        let started_at = Utc::now();
        let started = Instant::now();
        let correlation_id = options
            .correlation_id
            .clone()
            .unwrap_or_else(|| format!("{}:{}:review", plan.plan_id, step.id));

        let params = RouteCompletionParams::new(
            RoutingPurpose::Reviewing,
            AgentPromptTemplate::review(plan, step, candidate),
        )
        .with_temperature(self.params.temperature)
        .with_max_tokens(self.params.max_tokens)
        .with_correlation_id(correlation_id);

        let completion = self.gateway.complete(params).await?;

        let output = match parse_reviewer_response(&completion.text) {
            ParseOutcome::Parsed(output) => output,
            ParseOutcome::Malformed { raw, error } => {
                error!(
                    plan_id = %plan.plan_id,
                    step_id = %step.id,
                    error = %error,
                    raw = %clip_for_log(&raw, 512),
                    "Reviewer received an invalid response"
                );
                ReviewerOutput::invalid_response()
            }
        };

        self.metrics
            .record_latency(AgentKind::Reviewer, "act", started.elapsed());
        let counter = if output.approved {
            "reviews_approved"
        } else {
            "reviews_rejected"
        };
        self.metrics.increment(AgentKind::Reviewer, counter, &[]);

        let summary = if output.approved {
            "Reviewer approved the changes".to_string()
        } else {
            format!("Reviewer found {} findings", output.findings.len())
        };
        let report = AgentReport {
            issues: output.blocking_messages(),
            ..AgentReport::empty(AgentKind::Reviewer)
        }
        .with_summary(summary)
        .with_stat("findings", output.findings.len() as f64)
        .with_metadata("provider", completion.provider.clone());
        self.last_report.set(report.clone());

        let message = if output.approved {
            "Changes approved"
        } else {
            "Changes require adjustments"
        };
        let findings = serde_json::to_value(&output.findings).unwrap_or_default();
        let result = AgentActionResult::success(&step.id, message)
            .with_artifact("provider", completion.provider)
            .with_artifact("findings", findings)
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
    use conductor_domain::{CoderOutput, PlanDraft, Task};

    fn plan_and_step() -> (AgentPlan, PlanStep) {
        let task = Task::new("t-1", "add logging");
        let mut plan = PlanDraft::fallback(&task).into_plan(task, "mock");
        let step = PlanStep::new("t-1-step-3", "Review", AgentKind::Reviewer);
        plan.steps.push(step.clone());
        (plan, step)
    }

    fn reviewer(gateway: Arc<ScriptedGateway>, metrics: Arc<TrackingMetrics>) -> ReviewerAgent {
        ReviewerAgent::new(gateway, AgentParams::reviewer(), metrics)
    }

    #[tokio::test]
    async fn test_missing_candidate_is_an_error() {
        let gateway = Arc::new(ScriptedGateway::texts(&[]));
        let agent = reviewer(gateway.clone(), Arc::new(TrackingMetrics::default()));
        let (plan, step) = plan_and_step();

        let result = agent.act(&plan, &step, &AgentOptions::default()).await;

        assert!(matches!(result, Err(AgentError::MissingCandidate { .. })));
        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_approved_review() {
        let gateway = Arc::new(ScriptedGateway::texts(&[
            r#"{"approved": true, "findings": [{"type": "info", "message": "nice"}], "testsRequired": []}"#,
        ]));
        let metrics = Arc::new(TrackingMetrics::default());
        let agent = reviewer(gateway.clone(), metrics.clone());
        let (plan, step) = plan_and_step();
        let options = AgentOptions::default().with_candidate(CoderOutput::manual_intervention());

        let acted = agent.act(&plan, &step, &options).await.unwrap();

        assert!(acted.result.output.as_ref().unwrap().approved);
        assert_eq!(acted.result.message, "Changes approved");
        assert!(acted.report.issues.is_empty());
        assert_eq!(metrics.counters(), vec![(AgentKind::Reviewer, "reviews_approved".to_string())]);

        let request = &gateway.requests()[0];
        assert_eq!(request.purpose, RoutingPurpose::Reviewing);
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.max_tokens, Some(800));
        assert!(request.correlation_id.as_deref().unwrap().ends_with(":t-1-step-3:review"));
    }

    #[tokio::test]
    async fn test_invalid_response_is_unapproved_success() {
        let gateway = Arc::new(ScriptedGateway::texts(&["LGTM!"]));
        let metrics = Arc::new(TrackingMetrics::default());
        let agent = reviewer(gateway, metrics.clone());
        let (plan, step) = plan_and_step();
        let options = AgentOptions::default().with_candidate(CoderOutput::manual_intervention());

        let acted = agent.act(&plan, &step, &options).await.unwrap();

        assert!(acted.result.is_success());
        let output = acted.result.output.unwrap();
        assert!(!output.approved);
        assert_eq!(output.findings.len(), 1);
        assert_eq!(acted.report.issues.len(), 1);
        assert_eq!(acted.report.summaries, vec!["Reviewer found 1 findings"]);
        assert_eq!(metrics.counters(), vec![(AgentKind::Reviewer, "reviews_rejected".to_string())]);
    }
}
