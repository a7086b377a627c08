//! Completion providers and the purpose-aware router over them.

pub mod cache;
mod factory;
pub mod mock;
pub mod routing;
pub mod telemetry;

#[cfg(feature = "http-providers")]
pub mod anthropic;
#[cfg(feature = "http-providers")]
pub mod openai;

use async_trait::async_trait;
use conductor_domain::{CompletionOptions, CompletionResult, RouteCompletionParams};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Static description of a provider's model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMetadata {
    pub provider: String,
    pub model: String,
    pub max_tokens: u32,
    pub supports_tools: bool,
}

impl ProviderMetadata {
    pub fn new(provider: impl Into<String>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            max_tokens,
            supports_tools: false,
        }
    }

    pub fn with_tools(mut self) -> Self {
        self.supports_tools = true;
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("{0}")]
    NotConfigured(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Other(String),
}

/// A single model backend the router can dispatch to.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Id used in fallback orders
    fn id(&self) -> &str;

    fn metadata(&self) -> &ProviderMetadata;

    /// Produce a completion for `prompt`.
    ///
    /// `options` carries the router-merged generation settings; `params` is
    /// the original request, for providers that key off the purpose.
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
        params: &RouteCompletionParams,
    ) -> Result<CompletionResult, ProviderError>;

    async fn healthcheck(&self) -> bool {
        true
    }
}

/// Rough token estimate used when a backend reports no usage.
pub(crate) fn estimate_tokens(text: &str) -> u32 {
    u32::try_from(text.len().div_ceil(4)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::Http {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 429: rate limited");
    }
}
