//! Transaction journal port
//!
//! Append-only record of every request that reached the wallet.

use chrono::{DateTime, Utc};
use conductor_domain::{ExecutionResult, RiskRuleEvaluation, SimulationRequest};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub request: SimulationRequest,
    pub result: ExecutionResult,
    pub violations: Vec<RiskRuleEvaluation>,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn new(
        request: SimulationRequest,
        result: ExecutionResult,
        violations: Vec<RiskRuleEvaluation>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            request,
            result,
            violations,
            created_at: Utc::now(),
        }
    }
}

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Journal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Journal serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait TransactionJournal: Send + Sync {
    /// Append an entry and return it with its id and timestamp filled in.
    fn record(
        &self,
        request: &SimulationRequest,
        result: &ExecutionResult,
        violations: &[RiskRuleEvaluation],
    ) -> Result<JournalEntry, JournalError>;

    /// Entries recorded so far, oldest first.
    fn list(&self) -> Vec<JournalEntry>;
}
