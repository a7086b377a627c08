//! Wallet port
//!
//! Simulates or submits transaction requests. Only the executor worker uses
//! it, and only after the policy guard has allowed the request.

use async_trait::async_trait;
use conductor_domain::{ExecutionResult, SimulationRequest, SimulationResult};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WalletError {
    #[error("Wallet unavailable: {0}")]
    Unavailable(String),

    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("Insufficient balance: {0}")]
    InsufficientBalance(String),

    #[error("Wallet error: {0}")]
    Other(String),
}

#[async_trait]
pub trait WalletPort: Send + Sync {
    /// Account the wallet signs for
    fn address(&self) -> &str;

    /// Dry-run the request without mutating state.
    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult, WalletError>;

    /// Submit the request, yielding a transaction handle when one exists.
    async fn execute(&self, request: &SimulationRequest) -> Result<ExecutionResult, WalletError>;
}
