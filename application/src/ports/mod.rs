//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent_metrics;
pub mod completion_gateway;
pub mod progress;
pub mod tx_journal;
pub mod wallet;
