//! OpenAI Responses API provider

use super::{CompletionProvider, ProviderError, ProviderMetadata};
use crate::config::FileOpenAiConfig;
use async_trait::async_trait;
use conductor_domain::{
    CompletionOptions, CompletionResult, CompletionUsage, RouteCompletionParams,
};
use serde::Deserialize;
use std::time::Instant;
use tracing::debug;

const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1500;

pub struct OpenAiProvider {
    client: reqwest::Client,
    metadata: ProviderMetadata,
    api_key: Option<String>,
    base_url: String,
    organization: Option<String>,
}

impl OpenAiProvider {
    pub fn new(config: &FileOpenAiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            metadata: ProviderMetadata::new("openai", &config.model, config.max_tokens).with_tools(),
            api_key: config.resolve_api_key(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            organization: config.organization.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResponsesBody {
    #[serde(default)]
    output: Vec<OutputItem>,
    usage: Option<ResponsesUsage>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponsesUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn id(&self) -> &str {
        "openai"
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
                "OpenAI API key missing. Set OPENAI_API_KEY or configure the provider."
                    .to_string(),
            ));
        };

        let body = serde_json::json!({
            "model": self.metadata.model,
            "input": prompt,
            "temperature": options.temperature.or(params.temperature).unwrap_or(0.0),
            "max_output_tokens": options
                .max_tokens
                .or(params.max_tokens)
                .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
        });

        let mut request = self
            .client
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(api_key)
            .json(&body);
        if let Some(org) = &self.organization {
            request = request.header("OpenAI-Organization", org);
        }

        let started = Instant::now();
        let response = request
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

        let parsed: ResponsesBody = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        debug!(model = %self.metadata.model, latency_ms, "OpenAI response received");

        let text = parsed
            .output
            .first()
            .and_then(|item| item.content.first())
            .and_then(|part| part.text.clone())
            .unwrap_or_default();

        let mut result = CompletionResult::new(text, "openai", latency_ms);
        if let Some(usage) = parsed.usage {
            result = result.with_usage(CompletionUsage {
                prompt_tokens: usage.input_tokens,
                completion_tokens: usage.output_tokens,
                total_tokens: usage.total_tokens,
            });
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_domain::RoutingPurpose;

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let config = FileOpenAiConfig {
            api_key_env: "CONDUCTOR_TEST_UNSET_OPENAI_KEY".to_string(),
            api_key: None,
            ..Default::default()
        };
        let provider = OpenAiProvider::new(&config);
        let params = RouteCompletionParams::new(RoutingPurpose::Planning, "hi");

        let err = provider
            .complete("hi", &CompletionOptions::default(), &params)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
        assert!(provider.metadata().supports_tools);
    }

    #[test]
    fn test_response_body_shape() {
        let body: ResponsesBody = serde_json::from_str(
            r#"{"output":[{"content":[{"text":"hello"}]}],"usage":{"input_tokens":3,"output_tokens":1,"total_tokens":4}}"#,
        )
        .unwrap();
        assert_eq!(body.output[0].content[0].text.as_deref(), Some("hello"));
        assert_eq!(body.usage.unwrap().total_tokens, 4);
    }
}
