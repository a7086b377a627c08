//! Provider configuration from TOML (`[providers]` section)

use super::issues::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Offline mock provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMockConfig {
    /// Artificial latency per completion
    pub latency_ms: u64,
    /// Purpose name → canned response text
    pub responses: HashMap<String, String>,
}

impl Default for FileMockConfig {
    fn default() -> Self {
        Self {
            latency_ms: 5,
            responses: HashMap::new(),
        }
    }
}

/// Anthropic API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    /// Anthropic API version header.
    pub api_version: String,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 16_000,
            api_version: "2023-06-01".to_string(),
        }
    }
}

impl FileAnthropicConfig {
    /// Direct key if set, otherwise the value of `api_key_env`.
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), &self.api_key_env)
    }
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for the OpenAI API (can be overridden for compatible gateways).
    pub base_url: String,
    pub model: String,
    pub organization: Option<String>,
    pub max_tokens: u32,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "o1-preview".to_string(),
            organization: None,
            max_tokens: 16_384,
        }
    }
}

impl FileOpenAiConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), &self.api_key_env)
    }
}

fn resolve_key(direct: Option<&str>, env_var: &str) -> Option<String> {
    direct
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok().filter(|k| !k.is_empty()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Provider ids to register with the router
    pub enabled: Vec<String>,
    pub mock: FileMockConfig,
    pub openai: FileOpenAiConfig,
    pub anthropic: FileAnthropicConfig,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            enabled: vec!["mock".to_string()],
            mock: FileMockConfig::default(),
            openai: FileOpenAiConfig::default(),
            anthropic: FileAnthropicConfig::default(),
        }
    }
}

impl FileProvidersConfig {
    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled.iter().any(|e| e == id)
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.enabled.iter().any(|id| id.trim().is_empty()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyProviderId {
                    field: "providers.enabled".to_string(),
                },
                "providers.enabled: provider id cannot be empty",
            ));
        }
        if self.enabled.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "providers.enabled".to_string(),
                    value: "[]".to_string(),
                },
                "providers.enabled is empty: every completion will fail",
            ));
        }
        issues
    }
}
