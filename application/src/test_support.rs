//! Test doubles shared by the worker and coordinator tests.

use crate::ports::agent_metrics::AgentMetrics;
use crate::ports::completion_gateway::{CompletionGateway, GatewayError};
use crate::ports::tx_journal::{JournalEntry, JournalError, TransactionJournal};
use crate::ports::wallet::{WalletError, WalletPort};
use async_trait::async_trait;
use conductor_domain::{
    AgentKind, CompletionResult, ExecutionResult, RiskRuleEvaluation, RouteCompletionParams,
    SimulationRequest, SimulationResult,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Gateway returning scripted responses in order.
pub struct ScriptedGateway {
    responses: Mutex<VecDeque<Result<CompletionResult, GatewayError>>>,
    pub requests: Mutex<Vec<RouteCompletionParams>>,
}

impl ScriptedGateway {
    pub fn new(responses: Vec<Result<CompletionResult, GatewayError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn texts(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| Ok(CompletionResult::new(*t, "scripted", 3)))
                .collect(),
        )
    }

    pub fn requests(&self) -> Vec<RouteCompletionParams> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    async fn complete(&self, params: RouteCompletionParams) -> Result<CompletionResult, GatewayError> {
        self.requests.lock().unwrap().push(params);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Provider("no scripted response left".to_string())))
    }
}

/// Metrics sink remembering every call.
#[derive(Default)]
pub struct TrackingMetrics {
    pub latencies: Mutex<Vec<(AgentKind, String)>>,
    pub counters: Mutex<Vec<(AgentKind, String)>>,
}

impl TrackingMetrics {
    pub fn counters(&self) -> Vec<(AgentKind, String)> {
        self.counters.lock().unwrap().clone()
    }

    pub fn latencies(&self) -> Vec<(AgentKind, String)> {
        self.latencies.lock().unwrap().clone()
    }
}

impl AgentMetrics for TrackingMetrics {
    fn record_latency(&self, agent: AgentKind, operation: &str, _elapsed: Duration) {
        self.latencies.lock().unwrap().push((agent, operation.to_string()));
    }

    fn increment(&self, agent: AgentKind, metric: &str, _tags: &[(&str, &str)]) {
        self.counters.lock().unwrap().push((agent, metric.to_string()));
    }
}

/// Wallet counting calls and returning a fixed gas figure.
#[derive(Default)]
pub struct RecordingWallet {
    pub simulations: Mutex<Vec<SimulationRequest>>,
    pub executions: Mutex<Vec<SimulationRequest>>,
}

impl RecordingWallet {
    pub fn simulation_count(&self) -> usize {
        self.simulations.lock().unwrap().len()
    }

    pub fn execution_count(&self) -> usize {
        self.executions.lock().unwrap().len()
    }
}

#[async_trait]
impl WalletPort for RecordingWallet {
    fn address(&self) -> &str {
        "0xwallet"
    }

    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult, WalletError> {
        self.simulations.lock().unwrap().push(request.clone());
        Ok(SimulationResult {
            success: true,
            gas_used: 21_000,
            warnings: vec![],
            return_data: None,
        })
    }

    async fn execute(&self, request: &SimulationRequest) -> Result<ExecutionResult, WalletError> {
        self.executions.lock().unwrap().push(request.clone());
        Ok(ExecutionResult {
            success: true,
            gas_used: 42_000,
            warnings: vec![],
            return_data: None,
            transaction_hash: Some("0xhash".to_string()),
            nonce: Some(7),
        })
    }
}

#[derive(Default)]
pub struct MemoryJournal {
    entries: Mutex<Vec<JournalEntry>>,
}

impl TransactionJournal for MemoryJournal {
    fn record(
        &self,
        request: &SimulationRequest,
        result: &ExecutionResult,
        violations: &[RiskRuleEvaluation],
    ) -> Result<JournalEntry, JournalError> {
        let entry = JournalEntry::new(request.clone(), result.clone(), violations.to_vec());
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    fn list(&self) -> Vec<JournalEntry> {
        self.entries.lock().unwrap().clone()
    }
}
