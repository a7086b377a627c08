use conductor_application::{JournalEntry, JournalError, TransactionJournal};
use conductor_domain::{ExecutionResult, RiskRuleEvaluation, SimulationRequest};
use std::sync::Mutex;

/// Journal that lives for the duration of the process.
#[derive(Debug, Default)]
pub struct InMemoryJournal {
    entries: Mutex<Vec<JournalEntry>>,
}

impl InMemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionJournal for InMemoryJournal {
    fn record(
        &self,
        request: &SimulationRequest,
        result: &ExecutionResult,
        violations: &[RiskRuleEvaluation],
    ) -> Result<JournalEntry, JournalError> {
        let entry = JournalEntry::new(request.clone(), result.clone(), violations.to_vec());
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(entry.clone());
        Ok(entry)
    }

    fn list(&self) -> Vec<JournalEntry> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}
