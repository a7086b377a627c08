//! Executor worker
//!
//! Resolves a transaction payload, gates it through the policy guard and,
//! only when allowed, hands it to the wallet. Every wallet call is journaled.

use super::contract::{Acted, Agent, AgentError, AgentOptions, ReportSlot};
use crate::config::ExecutorConfig;
use crate::ports::agent_metrics::AgentMetrics;
use crate::ports::tx_journal::TransactionJournal;
use crate::ports::wallet::WalletPort;
use async_trait::async_trait;
use chrono::Utc;
use conductor_domain::{
    AgentActionResult, AgentKind, AgentPlan, AgentReport, ExecutionMode, ExecutionResult,
    ExecutorPayload, PayloadDraft, PlanStep, PolicyGuard,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub struct ExecutorAgent {
    wallet: Arc<dyn WalletPort>,
    guard: PolicyGuard,
    journal: Arc<dyn TransactionJournal>,
    config: ExecutorConfig,
    metrics: Arc<dyn AgentMetrics>,
    last_report: ReportSlot,
}

impl ExecutorAgent {
    pub fn new(
        wallet: Arc<dyn WalletPort>,
        guard: PolicyGuard,
        journal: Arc<dyn TransactionJournal>,
        config: ExecutorConfig,
        metrics: Arc<dyn AgentMetrics>,
    ) -> Self {
        Self {
            wallet,
            guard,
            journal,
            config,
            metrics,
            last_report: ReportSlot::new(AgentKind::Executor),
        }
    }

    /// Explicit payload first, then the step's parameters.
    fn resolve_payload(&self, step: &PlanStep, options: &AgentOptions) -> Result<ExecutorPayload, AgentError> {
        if let Some(payload) = &options.payload {
            return Ok(payload.clone());
        }
        let draft = PayloadDraft::from_step(step).ok_or_else(|| AgentError::MissingPayload {
            step_id: step.id.clone(),
        })?;
        Ok(ExecutorPayload {
            request: draft.request,
            context: self.guard.rules().build_context(draft.context),
            mode: draft.mode,
        })
    }
}

#[async_trait]
impl Agent for ExecutorAgent {
    type Output = ExecutionResult;

    fn kind(&self) -> AgentKind {
        AgentKind::Executor
    }

    async fn act(
        &self,
        _plan: &AgentPlan,
        step: &PlanStep,
        options: &AgentOptions,
    ) -> Result<Acted<ExecutionResult>, AgentError> {
        let payload = self.resolve_payload(step, options)?;
        let decision = self.guard.enforce(&payload.request, &payload.context);

        if !decision.allowed {
            warn!(
                step_id = %step.id,
                to = %payload.request.to,
                violations = decision.violations.len(),
                "Policy guard rejected execution"
            );
            let report = AgentReport {
                issues: decision
                    .violations
                    .iter()
                    .map(|v| v.describe().to_string())
                    .collect(),
                ..AgentReport::empty(AgentKind::Executor)
            }
            .with_summary("PolicyGuard blocked the operation")
            .with_stat("violations", decision.violations.len() as f64);
            self.last_report.set(report.clone());
            self.metrics
                .increment(AgentKind::Executor, "policy_rejections", &[]);

            let violations = serde_json::to_value(&decision.violations).unwrap_or_default();
            let result = AgentActionResult::failed(&step.id, "PolicyGuard rejected execution")
                .with_artifact("violations", violations)
                .with_output(ExecutionResult::policy_rejection());
            return Ok(Acted { result, report });
        }

        let mode = payload.mode.unwrap_or_else(|| {
            ExecutionMode::from_dry_run(options.dry_run.unwrap_or(self.config.dry_run))
        });

        let started_at = Utc::now();
        let started = Instant::now();
        let result = match mode {
            ExecutionMode::Execute => self.wallet.execute(&payload.request).await?,
            ExecutionMode::Simulate => self.wallet.simulate(&payload.request).await?.into(),
        };
        self.metrics
            .record_latency(AgentKind::Executor, mode.as_str(), started.elapsed());
        let counter = match mode {
            ExecutionMode::Execute => "transactions_executed",
            ExecutionMode::Simulate => "transactions_simulated",
        };
        self.metrics.increment(AgentKind::Executor, counter, &[]);

        self.journal
            .record(&payload.request, &result, &decision.violations)?;

        info!(
            step_id = %step.id,
            mode = %mode,
            gas_used = result.gas_used,
            "Wallet call completed"
        );

        let transaction_hash = result
            .transaction_hash
            .clone()
            .map(Value::String)
            .unwrap_or(Value::Null);
        let summary = match mode {
            ExecutionMode::Execute => "Operation executed",
            ExecutionMode::Simulate => "Simulation completed",
        };
        let report = AgentReport {
            issues: result.warnings.iter().filter(|w| !w.is_empty()).cloned().collect(),
            ..AgentReport::empty(AgentKind::Executor)
        }
        .with_summary(summary)
        .with_stat("gasUsed", result.gas_used as f64)
        .with_stat("warnings", result.warnings.len() as f64)
        .with_metadata("mode", mode.as_str())
        .with_metadata("transactionHash", transaction_hash.clone());
        self.last_report.set(report.clone());

        let message = match mode {
            ExecutionMode::Execute => "Execute OK",
            ExecutionMode::Simulate => "Simulation OK",
        };
        let action = AgentActionResult::success(&step.id, message)
            .with_artifact("mode", mode.as_str())
            .with_artifact("transactionHash", transaction_hash)
            .with_artifact("warnings", result.warnings.clone())
            .with_timing(started_at, Utc::now())
            .with_output(result);

        Ok(Acted {
            result: action,
            report,
        })
    }

    fn report(&self) -> AgentReport {
        self.last_report.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryJournal, RecordingWallet, TrackingMetrics};
    use conductor_domain::{
        DefaultRiskRules, PlanDraft, PolicyConfig, RiskContext, SimulationRequest, StepParameters,
        Task,
    };
    use serde_json::json;

    struct Fixture {
        wallet: Arc<RecordingWallet>,
        journal: Arc<MemoryJournal>,
        metrics: Arc<TrackingMetrics>,
        agent: ExecutorAgent,
    }

    fn fixture(config: ExecutorConfig) -> Fixture {
        let wallet = Arc::new(RecordingWallet::default());
        let journal = Arc::new(MemoryJournal::default());
        let metrics = Arc::new(TrackingMetrics::default());
        let guard = PolicyGuard::new(
            Arc::new(DefaultRiskRules::default()),
            PolicyConfig::default()
                .with_allowlist(vec!["0xaaaa".to_string()])
                .with_slippage_bps_limit(50),
        );
        let agent = ExecutorAgent::new(wallet.clone(), guard, journal.clone(), config, metrics.clone());
        Fixture {
            wallet,
            journal,
            metrics,
            agent,
        }
    }

    fn plan() -> AgentPlan {
        let task = Task::new("t-1", "rebalance");
        PlanDraft::fallback(&task).into_plan(task, "mock")
    }

    fn payload(to: &str, slippage_bps: u32) -> ExecutorPayload {
        ExecutorPayload {
            request: SimulationRequest::new("0xfrom", to).with_slippage_bps(slippage_bps),
            context: RiskContext {
                address: "0xfrom".to_string(),
                portfolio_value_usd: 10_000.0,
                position_size_usd: 1_000.0,
                ltv: Some(0.3),
            },
            mode: None,
        }
    }

    fn executor_step() -> PlanStep {
        PlanStep::new("t-1-step-4", "Execute", AgentKind::Executor)
    }

    #[tokio::test]
    async fn test_allowed_payload_is_simulated() {
        let f = fixture(ExecutorConfig::default());
        let options = AgentOptions::default().with_payload(payload("0xaaaa", 25));

        let acted = f.agent.act(&plan(), &executor_step(), &options).await.unwrap();

        assert!(acted.result.is_success());
        assert_eq!(acted.result.message, "Simulation OK");
        assert_eq!(acted.result.artifacts["mode"], "simulate");
        assert_eq!(f.wallet.simulation_count(), 1);
        assert_eq!(f.wallet.execution_count(), 0);
        assert_eq!(f.journal.list().len(), 1);
        assert!(f.journal.list()[0].violations.is_empty());
        assert_eq!(f.metrics.latencies(), vec![(AgentKind::Executor, "simulate".to_string())]);
        assert_eq!(
            f.metrics.counters(),
            vec![(AgentKind::Executor, "transactions_simulated".to_string())]
        );
    }

    #[tokio::test]
    async fn test_denied_payload_never_reaches_wallet() {
        let f = fixture(ExecutorConfig::default());
        let options = AgentOptions::default().with_payload(payload("0xbbbb", 80));

        let acted = f.agent.act(&plan(), &executor_step(), &options).await.unwrap();

        assert!(!acted.result.is_success());
        assert_eq!(acted.result.message, "PolicyGuard rejected execution");
        assert_eq!(acted.result.artifacts["violations"].as_array().unwrap().len(), 2);
        let output = acted.result.output.unwrap();
        assert_eq!(output.gas_used, 0);
        assert_eq!(output.warnings, vec!["PolicyGuard rejection"]);
        assert_eq!(f.wallet.simulation_count() + f.wallet.execution_count(), 0);
        assert!(f.journal.list().is_empty());
        assert_eq!(acted.report.issues.len(), 2);
        assert_eq!(
            f.metrics.counters(),
            vec![(AgentKind::Executor, "policy_rejections".to_string())]
        );
        assert!(f.metrics.latencies().is_empty());
    }

    #[tokio::test]
    async fn test_mode_precedence() {
        // Caller dry-run flag beats the config default
        let f = fixture(ExecutorConfig::default().with_dry_run(true));
        let options = AgentOptions::default()
            .with_payload(payload("0xaaaa", 10))
            .with_dry_run(false);
        let acted = f.agent.act(&plan(), &executor_step(), &options).await.unwrap();
        assert_eq!(acted.result.message, "Execute OK");
        assert_eq!(acted.result.artifacts["transactionHash"], "0xhash");
        assert_eq!(f.wallet.execution_count(), 1);
        assert_eq!(
            f.metrics.counters(),
            vec![(AgentKind::Executor, "transactions_executed".to_string())]
        );

        // Payload mode beats the caller flag
        let mut explicit = payload("0xaaaa", 10);
        explicit.mode = Some(ExecutionMode::Simulate);
        let options = AgentOptions::default().with_payload(explicit).with_dry_run(false);
        f.agent.act(&plan(), &executor_step(), &options).await.unwrap();
        assert_eq!(f.wallet.simulation_count(), 1);
    }

    #[tokio::test]
    async fn test_payload_from_step_parameters() {
        let f = fixture(ExecutorConfig::default());
        let params: StepParameters = serde_json::from_value(json!({
            "request": {"from": "0xfrom", "to": "0xAAAA", "slippageBps": 5},
            "context": {"address": "0xfrom"},
            "positions": [{"balance": 100.0}],
            "mode": "execute"
        }))
        .unwrap();
        let step = executor_step().with_parameters(params);

        // position defaults to the whole portfolio, which breaches the 20% limit
        let acted = f.agent.act(&plan(), &step, &AgentOptions::default()).await.unwrap();
        assert!(!acted.result.is_success());
        assert!(acted.report.issues[0].contains("Position 100.00 USD"));
    }

    #[tokio::test]
    async fn test_missing_payload_is_an_error() {
        let f = fixture(ExecutorConfig::default());
        let result = f.agent.act(&plan(), &executor_step(), &AgentOptions::default()).await;
        assert!(matches!(result, Err(AgentError::MissingPayload { .. })));
    }
}
