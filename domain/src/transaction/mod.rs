//! Transaction domain module
//!
//! Requests the executor hands to a wallet, the results it gets back, and
//! the risk context used to gate them.

pub mod payload;
pub mod types;

pub use payload::{ExecutorPayload, PayloadDraft};
pub use types::{
    AccountPosition, ExecutionMode, ExecutionResult, RiskContext, RiskContextInput,
    SimulationRequest, SimulationResult,
};
