//! Wallet adapters

mod simulated;

pub use simulated::{SimulatedWallet, SimulatedWalletConfig};
