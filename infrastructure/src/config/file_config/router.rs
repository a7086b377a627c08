//! Router configuration from TOML (`[router]` section)

use super::issues::{ConfigIssue, ConfigIssueCode};
use crate::providers::routing::RouterOptions;
use conductor_domain::RoutingPurpose;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw router configuration from TOML
///
/// # Example
///
/// ```toml
/// [router]
/// default_temperature = 0.2
/// cache = true
///
/// [router.fallback_order]
/// planning = ["anthropic", "mock"]
/// coding = ["openai", "mock"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRouterConfig {
    pub default_temperature: Option<f64>,
    /// Purpose name → provider ids, replacing the built-in order
    pub fallback_order: HashMap<String, Vec<String>>,
    /// Keep an in-memory response cache for the lifetime of the process
    pub cache: bool,
}

impl Default for FileRouterConfig {
    fn default() -> Self {
        Self {
            default_temperature: None,
            fallback_order: HashMap::new(),
            cache: true,
        }
    }
}

impl FileRouterConfig {
    pub fn to_router_options(&self) -> RouterOptions {
        RouterOptions {
            fallback_order: self.fallback_order.clone(),
            default_temperature: self.default_temperature,
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let mut purposes: Vec<&String> = self.fallback_order.keys().collect();
        purposes.sort();
        for purpose in purposes {
            if !RoutingPurpose::from(purpose.as_str()).is_known() {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::UnknownPurpose {
                        purpose: purpose.clone(),
                    },
                    format!(
                        "router.fallback_order.{}: unknown purpose, requests for it use it verbatim",
                        purpose
                    ),
                ));
            }
            if self.fallback_order[purpose].iter().any(|id| id.trim().is_empty()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyProviderId {
                        field: format!("router.fallback_order.{}", purpose),
                    },
                    format!("router.fallback_order.{}: provider id cannot be empty", purpose),
                ));
            }
        }

        if let Some(temperature) = self.default_temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "router.default_temperature".to_string(),
                    value: temperature.to_string(),
                },
                format!(
                    "router.default_temperature: {} is outside 0.0..=2.0",
                    temperature
                ),
            ));
        }

        issues
    }
}
