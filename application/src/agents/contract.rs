//! Worker lifecycle contract

use crate::ports::completion_gateway::GatewayError;
use crate::ports::tx_journal::JournalError;
use crate::ports::wallet::WalletError;
use async_trait::async_trait;
use conductor_domain::{
    AgentActionResult, AgentKind, AgentObservation, AgentPlan, AgentReport, CoderOutput,
    ExecutorPayload, PlanStep, Task,
};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::debug;

/// Errors raised by a worker.
///
/// Malformed model output is never an error; it is absorbed into the payload.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("{agent} does not support {operation}")]
    UnsupportedOperation {
        agent: &'static str,
        operation: &'static str,
    },

    #[error("Reviewer step {step_id} requires a coder candidate")]
    MissingCandidate { step_id: String },

    #[error("Executor step {step_id} has no payload")]
    MissingPayload { step_id: String },

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),
}

/// Per-call options handed to a worker.
#[derive(Debug, Clone, Default)]
pub struct AgentOptions {
    /// Caller's dry-run preference; the executor falls back to its config
    pub dry_run: Option<bool>,
    pub correlation_id: Option<String>,
    /// Coder output a reviewer must judge
    pub candidate: Option<CoderOutput>,
    /// Explicit executor payload, taking precedence over step parameters
    pub payload: Option<ExecutorPayload>,
}

impl AgentOptions {
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = Some(dry_run);
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_candidate(mut self, candidate: CoderOutput) -> Self {
        self.candidate = Some(candidate);
        self
    }

    pub fn with_payload(mut self, payload: ExecutorPayload) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// A plan and the report produced while making it.
#[derive(Debug, Clone)]
pub struct Planned {
    pub plan: AgentPlan,
    pub report: AgentReport,
}

/// A step result and the report produced while acting.
#[derive(Debug, Clone)]
pub struct Acted<O> {
    pub result: AgentActionResult<O>,
    pub report: AgentReport,
}

#[async_trait]
pub trait Agent: Send + Sync {
    /// Role-specific payload carried by `act` results
    type Output: Send;

    fn kind(&self) -> AgentKind;

    fn name(&self) -> &'static str {
        self.kind().display_name()
    }

    /// Produce a plan for a task. Only the planner supports this.
    async fn plan(&self, _task: &Task, _options: &AgentOptions) -> Result<Planned, AgentError> {
        Err(AgentError::UnsupportedOperation {
            agent: self.name(),
            operation: "plan",
        })
    }

    async fn act(
        &self,
        plan: &AgentPlan,
        step: &PlanStep,
        options: &AgentOptions,
    ) -> Result<Acted<Self::Output>, AgentError>;

    async fn observe(&self, observation: &AgentObservation) {
        debug!(
            agent = %self.kind(),
            source = %observation.source,
            data = %observation.data,
            "{} observation: {}",
            self.name(),
            observation.message
        );
    }

    /// The last report produced by `plan` or `act`, or an empty one.
    fn report(&self) -> AgentReport;
}

/// Last-report storage shared by the workers.
pub(crate) struct ReportSlot(Mutex<AgentReport>);

impl ReportSlot {
    pub(crate) fn new(kind: AgentKind) -> Self {
        Self(Mutex::new(AgentReport::empty(kind)))
    }

    pub(crate) fn get(&self) -> AgentReport {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn set(&self, report: AgentReport) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = report;
    }
}
