//! Application layer for conductor
//!
//! This crate contains the role workers, the coordinator use case, port
//! definitions, and application configuration.
//! It depends only on the domain layer.

pub mod agents;
pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use agents::{
    Acted, Agent, AgentError, AgentOptions, CoderAgent, ExecutorAgent, Planned, PlannerAgent,
    ReviewerAgent,
};
pub use config::{AgentParams, ExecutorConfig, PolicyConfig};
pub use ports::{
    agent_metrics::{AgentMetrics, NoMetrics},
    completion_gateway::{CompletionGateway, GatewayError, ProviderFailure},
    progress::{CoordinatorProgress, NoProgress},
    tx_journal::{JournalEntry, JournalError, TransactionJournal},
    wallet::{WalletError, WalletPort},
};
pub use use_cases::run_coordinator::{
    CandidateSelection, CoordinatorRunOptions, ExecutorOverrides, RunCoordinatorError,
    RunCoordinatorUseCase,
};
