//! Worker configuration from TOML (`[planner]`, `[coder]`, `[reviewer]`, `[executor]`)

use super::issues::{ConfigIssue, ConfigIssueCode};
use conductor_application::{AgentParams, ExecutorConfig};
use serde::{Deserialize, Serialize};

/// Raw completion settings for one model-backed worker.
///
/// Unset fields keep the worker's built-in default.
///
/// ```toml
/// [planner]
/// temperature = 0.3
/// max_tokens = 2000
/// prompt_override = "Plan the following goal: {{GOAL}}"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub prompt_override: Option<String>,
}

impl FileAgentConfig {
    /// Layer these settings over `defaults`.
    pub fn apply_to(&self, defaults: AgentParams) -> AgentParams {
        let mut params = defaults;
        if let Some(temperature) = self.temperature {
            params = params.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            params = params.with_max_tokens(max_tokens);
        }
        if let Some(prompt) = &self.prompt_override {
            params = params.with_prompt_override(prompt.clone());
        }
        params
    }

    pub(super) fn validate(&self, section: &str, allows_prompt_override: bool) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if let Some(temperature) = self.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: format!("{}.temperature", section),
                    value: temperature.to_string(),
                },
                format!("{}.temperature: {} is outside 0.0..=2.0", section, temperature),
            ));
        }
        if self.max_tokens == Some(0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: format!("{}.max_tokens", section),
                    value: "0".to_string(),
                },
                format!("{}.max_tokens cannot be 0", section),
            ));
        }
        if !allows_prompt_override && self.prompt_override.is_some() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnusedField {
                    field: format!("{}.prompt_override", section),
                },
                format!(
                    "{}.prompt_override is only used by the planner and will be ignored",
                    section
                ),
            ));
        }
        issues
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutorConfig {
    /// Simulate instead of executing unless a step or the caller says otherwise
    pub dry_run: bool,
}

impl Default for FileExecutorConfig {
    fn default() -> Self {
        Self { dry_run: true }
    }
}

impl FileExecutorConfig {
    pub fn to_executor_config(&self) -> ExecutorConfig {
        ExecutorConfig::default().with_dry_run(self.dry_run)
    }
}
