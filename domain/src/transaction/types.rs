//! Transaction value types

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;

/// A state-mutating request to simulate or submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slippage_bps: Option<u32>,
}

impl SimulationRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            data: String::new(),
            value: None,
            slippage_bps: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    pub fn with_value(mut self, value: u128) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_slippage_bps(mut self, slippage_bps: u32) -> Self {
        self.slippage_bps = Some(slippage_bps);
        self
    }

    /// Hex SHA-256 over the request's fields, stable across runs.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.from.to_lowercase().as_bytes());
        hasher.update(self.to.to_lowercase().as_bytes());
        hasher.update(self.data.as_bytes());
        hasher.update(self.value.unwrap_or(0).to_string().as_bytes());
        hasher.update(self.slippage_bps.unwrap_or(0).to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub success: bool,
    pub gas_used: u64,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_data: Option<String>,
}

/// A simulation result plus the submission handle, when one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,
    pub gas_used: u64,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
}

impl ExecutionResult {
    /// Output recorded when the policy guard blocks a request.
    pub fn policy_rejection() -> Self {
        Self {
            success: false,
            gas_used: 0,
            warnings: vec!["PolicyGuard rejection".to_string()],
            return_data: None,
            transaction_hash: None,
            nonce: None,
        }
    }
}

impl From<SimulationResult> for ExecutionResult {
    fn from(sim: SimulationResult) -> Self {
        Self {
            success: sim.success,
            gas_used: sim.gas_used,
            warnings: sim.warnings,
            return_data: sim.return_data,
            transaction_hash: None,
            nonce: None,
        }
    }
}

/// A holding reported for an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPosition {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub asset: String,
    pub balance: f64,
    #[serde(default)]
    pub chain_id: u64,
}

/// Whether the wallet should only simulate or actually submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Simulate,
    Execute,
}

impl ExecutionMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            ExecutionMode::Simulate
        } else {
            ExecutionMode::Execute
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Simulate => "simulate",
            ExecutionMode::Execute => "execute",
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simulate" => Ok(ExecutionMode::Simulate),
            "execute" => Ok(ExecutionMode::Execute),
            other => Err(DomainError::UnknownExecutionMode(other.to_string())),
        }
    }
}

/// Account and portfolio figures consulted by the exposure rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskContext {
    pub address: String,
    pub portfolio_value_usd: f64,
    pub position_size_usd: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ltv: Option<f64>,
}

/// Raw, possibly partial figures a risk context is built from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskContextInput {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub portfolio_value_usd: Option<f64>,
    #[serde(default)]
    pub position_size_usd: Option<f64>,
    #[serde(default)]
    pub ltv: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_camel_case_wire_format() {
        let request: SimulationRequest = serde_json::from_value(serde_json::json!({
            "from": "0xfrom",
            "to": "0xaaaa",
            "data": "0x",
            "slippageBps": 25
        }))
        .unwrap();
        assert_eq!(request.slippage_bps, Some(25));
        assert!(request.value.is_none());
    }

    #[test]
    fn test_digest_ignores_address_case() {
        let a = SimulationRequest::new("0xABC", "0xDEF");
        let b = SimulationRequest::new("0xabc", "0xdef");
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), a.clone().with_slippage_bps(10).digest());
    }

    #[test]
    fn test_execution_mode_from_dry_run() {
        assert_eq!(ExecutionMode::from_dry_run(true), ExecutionMode::Simulate);
        assert_eq!(ExecutionMode::from_dry_run(false), ExecutionMode::Execute);
        assert_eq!("EXECUTE".parse::<ExecutionMode>().unwrap(), ExecutionMode::Execute);
    }

    #[test]
    fn test_policy_rejection_output() {
        let result = ExecutionResult::policy_rejection();
        assert!(!result.success);
        assert_eq!(result.gas_used, 0);
        assert_eq!(result.warnings, vec!["PolicyGuard rejection"]);
    }
}
