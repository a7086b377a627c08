//! In-process wallet with a deterministic ledger
//!
//! Gas, return data and transaction hashes derive from the request digest,
//! so identical requests always produce identical results.

use async_trait::async_trait;
use conductor_application::{WalletError, WalletPort};
use conductor_domain::{AccountPosition, ExecutionResult, SimulationRequest, SimulationResult};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Slippage above this raises a simulation warning.
const SLIPPAGE_WARNING_BPS: u32 = 50;
const BASE_GAS: u64 = 50_000;
const GAS_SPREAD: u64 = 20_000;
/// Balance an unseen sender starts with (10 ETH in wei).
const STARTING_BALANCE_WEI: u128 = 10_000_000_000_000_000_000;
const WEI_PER_ETH: f64 = 1e18;

#[derive(Debug, Clone)]
pub struct SimulatedWalletConfig {
    pub address: String,
    pub chain_id: u64,
    /// Execution returns a `dry-run-<uuid>` hash and leaves balances untouched
    pub dry_run: bool,
}

impl Default for SimulatedWalletConfig {
    fn default() -> Self {
        Self {
            address: crate::providers::mock::MOCK_ACCOUNT.to_string(),
            chain_id: 8453,
            dry_run: true,
        }
    }
}

#[derive(Debug, Default)]
struct Ledger {
    balances: HashMap<String, u128>,
    nonces: HashMap<String, u64>,
}

pub struct SimulatedWallet {
    config: SimulatedWalletConfig,
    ledger: Mutex<Ledger>,
}

impl SimulatedWallet {
    pub fn new(config: SimulatedWalletConfig) -> Self {
        Self {
            config,
            ledger: Mutex::new(Ledger::default()),
        }
    }

    /// Native balance held by `address`, in ETH.
    pub fn positions(&self, address: &str) -> Vec<AccountPosition> {
        let balance = self
            .ledger
            .lock()
            .ok()
            .and_then(|ledger| ledger.balances.get(&address.to_lowercase()).copied())
            .unwrap_or(0);
        vec![AccountPosition {
            address: address.to_string(),
            asset: "ETH".to_string(),
            balance: balance as f64 / WEI_PER_ETH,
            chain_id: self.config.chain_id,
        }]
    }

    fn simulate_request(request: &SimulationRequest) -> SimulationResult {
        let digest = request.digest();
        let seed = u64::from_str_radix(&digest[..8], 16).unwrap_or(0);
        let mut warnings = Vec::new();

        if let Some(slippage) = request.slippage_bps
            && slippage > SLIPPAGE_WARNING_BPS
        {
            warnings.push(format!("Slippage {}bps exceeds 0.5% policy.", slippage));
        }

        SimulationResult {
            success: warnings.is_empty(),
            gas_used: BASE_GAS + seed % GAS_SPREAD,
            warnings,
            return_data: Some(digest),
        }
    }

    fn next_nonce(ledger: &mut Ledger, address: &str) -> u64 {
        let nonce = ledger.nonces.entry(address.to_lowercase()).or_insert(0);
        let current = *nonce;
        *nonce += 1;
        current
    }

    fn apply_transfer(ledger: &mut Ledger, request: &SimulationRequest) -> Result<(), WalletError> {
        let value = request.value.unwrap_or(0);
        let sender_key = request.from.to_lowercase();
        let sender = *ledger
            .balances
            .entry(sender_key.clone())
            .or_insert(STARTING_BALANCE_WEI);
        if sender < value {
            return Err(WalletError::InsufficientBalance(format!(
                "{} holds {} wei, needs {}",
                request.from, sender, value
            )));
        }
        ledger.balances.insert(sender_key, sender - value);
        *ledger
            .balances
            .entry(request.to.to_lowercase())
            .or_insert(0) += value;
        Ok(())
    }
}

impl Default for SimulatedWallet {
    fn default() -> Self {
        Self::new(SimulatedWalletConfig::default())
    }
}

#[async_trait]
impl WalletPort for SimulatedWallet {
    fn address(&self) -> &str {
        &self.config.address
    }

    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult, WalletError> {
        let result = Self::simulate_request(request);
        debug!(to = %request.to, gas_used = result.gas_used, success = result.success, "Simulated request");
        Ok(result)
    }

    async fn execute(&self, request: &SimulationRequest) -> Result<ExecutionResult, WalletError> {
        let simulation = Self::simulate_request(request);
        if !simulation.success {
            return Ok(ExecutionResult::from(simulation));
        }

        let mut ledger = self
            .ledger
            .lock()
            .map_err(|_| WalletError::Unavailable("ledger lock poisoned".to_string()))?;

        let transaction_hash = if self.config.dry_run {
            format!("dry-run-{}", uuid::Uuid::new_v4())
        } else {
            Self::apply_transfer(&mut ledger, request)?;
            format!("0x{}", simulation.return_data.as_deref().unwrap_or_default())
        };
        let nonce = Self::next_nonce(&mut ledger, &request.from);

        debug!(to = %request.to, %transaction_hash, nonce, "Executed request");
        Ok(ExecutionResult {
            transaction_hash: Some(transaction_hash),
            nonce: Some(nonce),
            ..ExecutionResult::from(simulation)
        })
    }
}
