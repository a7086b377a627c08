//! Completion gateway port
//!
//! Defines how workers obtain model completions. The infrastructure router
//! implements it over a set of completion providers.

use async_trait::async_trait;
use conductor_domain::{CompletionResult, RouteCompletionParams};
use thiserror::Error;

/// One provider's failure while serving a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub provider: String,
    pub message: String,
}

impl ProviderFailure {
    pub fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.provider, self.message)
    }
}

fn join_failures(failures: &[ProviderFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur while obtaining a completion
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// None of the providers in the resolved order is registered
    #[error("no provider configured for purpose \"{purpose}\" (order: {})", .order.join(", "))]
    NoProviders { purpose: String, order: Vec<String> },

    /// Every registered provider in the resolved order failed
    #[error("no provider succeeded for purpose \"{purpose}\". Errors: {}", join_failures(.failures))]
    AllProvidersFailed {
        purpose: String,
        failures: Vec<ProviderFailure>,
    },

    #[error("Provider error: {0}")]
    Provider(String),
}

impl GatewayError {
    /// True when nothing could be attempted, as opposed to everything failing.
    pub fn is_not_configured(&self) -> bool {
        matches!(self, GatewayError::NoProviders { .. })
    }
}

/// Gateway for model completions
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, params: RouteCompletionParams) -> Result<CompletionResult, GatewayError>;
}
