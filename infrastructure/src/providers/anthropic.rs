//! Anthropic Messages API provider

use super::{CompletionProvider, ProviderError, ProviderMetadata};
use crate::config::FileAnthropicConfig;
use async_trait::async_trait;
use conductor_domain::{
    CompletionOptions, CompletionResult, CompletionUsage, RouteCompletionParams,
};
use serde::Deserialize;
use std::time::Instant;
use tracing::debug;

const DEFAULT_MAX_TOKENS: u32 = 1500;
const SYSTEM_PROMPT: &str =
    "You are the planner, coder and reviewer of an orchestration pipeline. Produce concise deterministic output.";

pub struct AnthropicProvider {
    client: reqwest::Client,
    metadata: ProviderMetadata,
    api_key: Option<String>,
    base_url: String,
    api_version: String,
}

impl AnthropicProvider {
    pub fn new(config: &FileAnthropicConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            metadata: ProviderMetadata::new("anthropic", &config.model, config.max_tokens)
                .with_tools(),
            api_key: config.resolve_api_key(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagesBody {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<MessagesUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagesUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    fn id(&self) -> &str {
        "anthropic"
    }

    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
        params: &RouteCompletionParams,
    ) -> Result<CompletionResult, ProviderError> {
        let Some(api_key) = &self.api_key else {
            return Err(ProviderError::NotConfigured(
                "Anthropic API key missing. Set ANTHROPIC_API_KEY or configure the provider."
                    .to_string(),
            ));
        };

        let body = serde_json::json!({
            "model": self.metadata.model,
            "max_tokens": options.max_tokens.or(params.max_tokens).unwrap_or(DEFAULT_MAX_TOKENS),
            "temperature": options.temperature.or(params.temperature).unwrap_or(0.0),
            "system": SYSTEM_PROMPT,
            "messages": [{"role": "user", "content": prompt}],
        });

        let started = Instant::now();
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Other(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }
        let latency_ms = started.elapsed().as_millis() as u64;

        let parsed: MessagesBody = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        debug!(model = %self.metadata.model, latency_ms, "Anthropic response received");

        let text = parsed
            .content
            .first()
            .and_then(|block| block.text.clone())
            .unwrap_or_default();

        let mut result = CompletionResult::new(text, "anthropic", latency_ms);
        if let Some(usage) = parsed.usage {
            result = result.with_usage(CompletionUsage {
                prompt_tokens: usage.input_tokens,
                completion_tokens: usage.output_tokens,
                total_tokens: usage.input_tokens + usage.output_tokens,
            });
        }
        Ok(result)
    }
}
