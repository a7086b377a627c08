//! Worker parameters: completion options and executor defaults.

use serde::{Deserialize, Serialize};

/// Completion options a model-backed worker sends with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentParams {
    pub temperature: f64,
    pub max_tokens: u32,
    /// Replaces the built-in prompt; `{{GOAL}}` is substituted. Planner only.
    pub prompt_override: Option<String>,
}

impl AgentParams {
    pub fn new(temperature: f64, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
            prompt_override: None,
        }
    }

    /// Planner defaults: temperature 0.2, 1200 tokens.
    pub fn planner() -> Self {
        Self::new(0.2, 1200)
    }

    /// Coder defaults: temperature 0.1, 1600 tokens.
    pub fn coder() -> Self {
        Self::new(0.1, 1600)
    }

    /// Reviewer defaults: temperature 0, 800 tokens.
    pub fn reviewer() -> Self {
        Self::new(0.0, 800)
    }

    // ==================== Builder Methods ====================

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_prompt_override(mut self, prompt: impl Into<String>) -> Self {
        self.prompt_override = Some(prompt.into());
        self
    }
}

/// Executor defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Simulate instead of execute when neither the step nor the caller decides
    pub dry_run: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { dry_run: true }
    }
}

impl ExecutorConfig {
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
