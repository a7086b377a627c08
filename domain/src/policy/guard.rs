//! Policy guard

use super::rules::{RiskRuleEvaluation, RiskRules};
use crate::transaction::{RiskContext, SimulationRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request-level limits the guard enforces.
///
/// Exposure limits belong to the [`RiskRules`] implementation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Destination addresses a request may target
    pub allowlist: Vec<String>,
    pub slippage_bps_limit: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allowlist: Vec::new(),
            slippage_bps_limit: 50,
        }
    }
}

impl PolicyConfig {
    pub fn with_allowlist(mut self, allowlist: Vec<String>) -> Self {
        self.allowlist = allowlist;
        self
    }

    pub fn with_slippage_bps_limit(mut self, limit: u32) -> Self {
        self.slippage_bps_limit = limit;
        self
    }
}

/// Allow/deny verdict with the failed evaluations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDecision {
    pub allowed: bool,
    pub violations: Vec<RiskRuleEvaluation>,
}

impl PolicyDecision {
    pub fn from_evaluations(evaluations: Vec<RiskRuleEvaluation>) -> Self {
        let violations: Vec<_> = evaluations.into_iter().filter(|e| !e.passed).collect();
        Self {
            allowed: violations.is_empty(),
            violations,
        }
    }
}

/// Runs slippage, allowlist and exposure checks as one decision.
#[derive(Clone)]
pub struct PolicyGuard {
    rules: Arc<dyn RiskRules>,
    config: PolicyConfig,
}

impl PolicyGuard {
    pub fn new(rules: Arc<dyn RiskRules>, config: PolicyConfig) -> Self {
        Self { rules, config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub fn rules(&self) -> &Arc<dyn RiskRules> {
        &self.rules
    }

    pub fn enforce(&self, request: &SimulationRequest, context: &RiskContext) -> PolicyDecision {
        let evaluations = vec![
            self.rules
                .evaluate_slippage(self.config.slippage_bps_limit, request),
            self.rules.evaluate_allowlist(&self.config.allowlist, request),
            self.rules.evaluate_exposure(request, context),
        ];
        PolicyDecision::from_evaluations(evaluations)
    }
}

impl std::fmt::Debug for PolicyGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyGuard")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{DefaultRiskRules, ExposureLimits};

    fn guard(allowlist: &[&str]) -> PolicyGuard {
        PolicyGuard::new(
            Arc::new(DefaultRiskRules::default()),
            PolicyConfig::default()
                .with_allowlist(allowlist.iter().map(|s| s.to_string()).collect())
                .with_slippage_bps_limit(50),
        )
    }

    fn context() -> RiskContext {
        RiskContext {
            address: "0xfrom".to_string(),
            portfolio_value_usd: 10_000.0,
            position_size_usd: 1_000.0,
            ltv: Some(0.4),
        }
    }

    #[test]
    fn test_denies_excess_slippage() {
        let request = SimulationRequest::new("0xfrom", "0xaaaa").with_slippage_bps(80);
        let decision = guard(&["0xaaaa"]).enforce(&request, &context());
        assert!(!decision.allowed);
        assert_eq!(decision.violations.len(), 1);
        assert_eq!(decision.violations[0].rule, "slippage_bps");
    }

    #[test]
    fn test_denies_destination_outside_allowlist() {
        let request = SimulationRequest::new("0xfrom", "0xbbbb").with_slippage_bps(10);
        let decision = guard(&["0xaaaa"]).enforce(&request, &context());
        assert!(!decision.allowed);
        assert_eq!(decision.violations[0].rule, "allowlist");
    }

    #[test]
    fn test_allows_when_all_rules_pass() {
        let request = SimulationRequest::new("0xfrom", "0xaaaa").with_slippage_bps(25);
        let decision = guard(&["0xaaaa"]).enforce(&request, &context());
        assert!(decision.allowed);
        assert!(decision.violations.is_empty());
    }

    #[test]
    fn test_collects_every_violation() {
        let request = SimulationRequest::new("0xfrom", "0xbbbb").with_slippage_bps(80);
        let mut ctx = context();
        ctx.ltv = Some(0.95);
        let decision = guard(&["0xaaaa"]).enforce(&request, &ctx);
        let rules: Vec<_> = decision.violations.iter().map(|v| v.rule.as_str()).collect();
        assert_eq!(rules, vec!["slippage_bps", "allowlist", "exposure"]);
    }

    #[test]
    fn test_policy_config_defaults() {
        let config: PolicyConfig = serde_json::from_value(serde_json::json!({
            "allowlist": ["0xaaaa"]
        }))
        .unwrap();
        assert_eq!(config.slippage_bps_limit, 50);
        assert_eq!(config.allowlist, vec!["0xaaaa"]);
    }

    #[test]
    fn test_exposure_limits_come_from_rules() {
        let strict = PolicyGuard::new(
            Arc::new(DefaultRiskRules::new(ExposureLimits {
                max_ltv: 0.3,
                max_position_share: 0.20,
            })),
            PolicyConfig::default().with_allowlist(vec!["0xaaaa".to_string()]),
        );
        let request = SimulationRequest::new("0xfrom", "0xaaaa").with_slippage_bps(10);

        let decision = strict.enforce(&request, &context());
        assert!(!decision.allowed);
        assert_eq!(decision.violations[0].rule, "exposure");
        assert!(guard(&["0xaaaa"]).enforce(&request, &context()).allowed);
    }
}
