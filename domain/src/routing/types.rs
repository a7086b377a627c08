//! Completion request and response records

use super::purpose::RoutingPurpose;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A completion request addressed to the router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCompletionParams {
    pub purpose: RoutingPurpose,
    pub input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl RouteCompletionParams {
    pub fn new(purpose: RoutingPurpose, input: impl Into<String>) -> Self {
        Self {
            purpose,
            input: input.into(),
            temperature: None,
            max_tokens: None,
            top_p: None,
            correlation_id: None,
            metadata: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata
            .get_or_insert_with(serde_json::Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Deterministic cache key: hex SHA-256 over purpose, input and the
    /// temperature, max tokens and metadata that are present.
    ///
    /// `top_p` and `correlation_id` do not take part.
    pub fn cache_key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.purpose.as_str().as_bytes());
        hasher.update(self.input.as_bytes());
        if let Some(temperature) = self.temperature {
            hasher.update(temperature.to_string().as_bytes());
        }
        if let Some(max_tokens) = self.max_tokens {
            hasher.update(max_tokens.to_string().as_bytes());
        }
        if let Some(metadata) = &self.metadata {
            let serialized = serde_json::Value::Object(metadata.clone()).to_string();
            hasher.update(serialized.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// Generation options handed to a provider after router defaults are merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f64>,
    #[serde(default)]
    pub stop: Vec<String>,
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompletionUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Text returned by a provider (or served from the router cache).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResult {
    pub text: String,
    /// Id of the provider that produced the text
    pub provider: String,
    pub latency_ms: u64,
    /// True only when served from the router cache
    #[serde(default)]
    pub cached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<CompletionUsage>,
}

impl CompletionResult {
    pub fn new(text: impl Into<String>, provider: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            text: text.into(),
            provider: provider.into(),
            latency_ms,
            cached: false,
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: CompletionUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}
