//! Risk rule evaluation

use crate::task::Severity;
use crate::transaction::{RiskContext, RiskContextInput, SimulationRequest};
use serde::{Deserialize, Serialize};

/// Outcome of evaluating one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRuleEvaluation {
    pub rule: String,
    pub passed: bool,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RiskRuleEvaluation {
    pub fn pass(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            passed: true,
            severity: Severity::Low,
            message: None,
        }
    }

    pub fn fail(rule: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            passed: false,
            severity,
            message: Some(message.into()),
        }
    }

    /// Message if present, otherwise the rule name.
    pub fn describe(&self) -> &str {
        self.message.as_deref().unwrap_or(&self.rule)
    }
}

/// Individual risk rule evaluations plus risk-context construction.
///
/// Implementations must be pure: no I/O, no wallet access.
pub trait RiskRules: Send + Sync {
    fn build_context(&self, input: RiskContextInput) -> RiskContext;

    fn evaluate_slippage(&self, limit_bps: u32, request: &SimulationRequest) -> RiskRuleEvaluation;

    fn evaluate_allowlist(&self, allowlist: &[String], request: &SimulationRequest) -> RiskRuleEvaluation;

    fn evaluate_exposure(&self, request: &SimulationRequest, context: &RiskContext) -> RiskRuleEvaluation;
}

/// Exposure thresholds used by [`DefaultRiskRules`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureLimits {
    /// Highest acceptable loan-to-value ratio
    pub max_ltv: f64,
    /// Largest position as a share of the portfolio
    pub max_position_share: f64,
}

impl Default for ExposureLimits {
    fn default() -> Self {
        Self {
            max_ltv: 0.70,
            max_position_share: 0.20,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DefaultRiskRules {
    limits: ExposureLimits,
}

impl DefaultRiskRules {
    pub fn new(limits: ExposureLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> ExposureLimits {
        self.limits
    }
}

impl RiskRules for DefaultRiskRules {
    fn build_context(&self, input: RiskContextInput) -> RiskContext {
        RiskContext {
            address: input.address.unwrap_or_default(),
            portfolio_value_usd: input.portfolio_value_usd.unwrap_or(0.0),
            position_size_usd: input.position_size_usd.unwrap_or(0.0),
            ltv: input.ltv,
        }
    }

    fn evaluate_slippage(&self, limit_bps: u32, request: &SimulationRequest) -> RiskRuleEvaluation {
        let slippage = request.slippage_bps.unwrap_or(0);
        if slippage <= limit_bps {
            RiskRuleEvaluation::pass("slippage_bps")
        } else {
            RiskRuleEvaluation::fail(
                "slippage_bps",
                Severity::High,
                format!("Slippage {slippage}bps exceeds limit {limit_bps}bps"),
            )
        }
    }

    fn evaluate_allowlist(&self, allowlist: &[String], request: &SimulationRequest) -> RiskRuleEvaluation {
        let allowed = allowlist.iter().any(|a| a.eq_ignore_ascii_case(&request.to));
        if allowed {
            RiskRuleEvaluation::pass("allowlist")
        } else {
            RiskRuleEvaluation::fail(
                "allowlist",
                Severity::Critical,
                format!("Destination {} is not in allowlist", request.to),
            )
        }
    }

    fn evaluate_exposure(&self, _request: &SimulationRequest, context: &RiskContext) -> RiskRuleEvaluation {
        let ltv = context.ltv.unwrap_or(0.0);
        let position_limit = context.portfolio_value_usd * self.limits.max_position_share;
        let mut problems = Vec::new();

        if ltv > self.limits.max_ltv {
            problems.push(format!("LTV {:.2} > {:.2}", ltv, self.limits.max_ltv));
        }
        if context.position_size_usd > position_limit {
            problems.push(format!(
                "Position {:.2} USD exceeds limit {:.2} USD",
                context.position_size_usd, position_limit
            ));
        }

        if problems.is_empty() {
            RiskRuleEvaluation::pass("exposure")
        } else {
            RiskRuleEvaluation::fail("exposure", Severity::High, problems.join("; "))
        }
    }
}
