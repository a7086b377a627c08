//! Executor payload resolution

use super::types::{AccountPosition, ExecutionMode, RiskContext, RiskContextInput, SimulationRequest};
use crate::plan::PlanStep;
use serde::{Deserialize, Serialize};

/// A fully resolved executor input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorPayload {
    pub request: SimulationRequest,
    pub context: RiskContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ExecutionMode>,
}

/// Executor input read from a step's parameters, before the risk context is built.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadDraft {
    pub request: SimulationRequest,
    pub context: RiskContextInput,
    pub mode: Option<ExecutionMode>,
}

impl PayloadDraft {
    /// Read `request`, `context`, `positions` and `mode` from a step.
    ///
    /// Returns `None` unless the step carries a request and a context with an
    /// address. When the context omits portfolio or position figures, the
    /// first position's balance is used for both.
    pub fn from_step(step: &PlanStep) -> Option<Self> {
        let request: SimulationRequest =
            serde_json::from_value(step.parameter("request")?.clone()).ok()?;
        let context: RiskContextInput =
            serde_json::from_value(step.parameter("context")?.clone()).ok()?;
        context.address.as_ref()?;

        let position_size = step
            .parameter("positions")
            .and_then(|v| serde_json::from_value::<Vec<AccountPosition>>(v.clone()).ok())
            .and_then(|positions| positions.first().map(|p| p.balance))
            .unwrap_or(0.0);

        let mode = step
            .parameter("mode")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<ExecutionMode>().ok());

        Some(Self {
            request,
            context: RiskContextInput {
                portfolio_value_usd: context.portfolio_value_usd.or(Some(position_size)),
                position_size_usd: context.position_size_usd.or(Some(position_size)),
                ..context
            },
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentKind;
    use crate::plan::StepParameters;
    use serde_json::json;

    fn step_with(params: serde_json::Value) -> PlanStep {
        let params: StepParameters = serde_json::from_value(params).unwrap();
        PlanStep::new("exec", "Execute", AgentKind::Executor).with_parameters(params)
    }

    #[test]
    fn test_draft_defaults_figures_from_positions() {
        let step = step_with(json!({
            "request": {"from": "0x1", "to": "0xaaaa", "slippageBps": 10},
            "context": {"address": "0x1"},
            "positions": [{"balance": 1500.0}],
            "mode": "simulate"
        }));
        let draft = PayloadDraft::from_step(&step).unwrap();
        assert_eq!(draft.context.portfolio_value_usd, Some(1500.0));
        assert_eq!(draft.context.position_size_usd, Some(1500.0));
        assert_eq!(draft.mode, Some(ExecutionMode::Simulate));
    }

    #[test]
    fn test_draft_keeps_explicit_figures() {
        let step = step_with(json!({
            "request": {"from": "0x1", "to": "0xaaaa"},
            "context": {"address": "0x1", "portfolioValueUsd": 10000.0, "ltv": 0.3},
            "positions": [{"balance": 500.0}]
        }));
        let draft = PayloadDraft::from_step(&step).unwrap();
        assert_eq!(draft.context.portfolio_value_usd, Some(10000.0));
        assert_eq!(draft.context.position_size_usd, Some(500.0));
        assert_eq!(draft.context.ltv, Some(0.3));
        assert!(draft.mode.is_none());
    }

    #[test]
    fn test_draft_requires_address() {
        let step = step_with(json!({
            "request": {"from": "0x1", "to": "0xaaaa"},
            "context": {"portfolioValueUsd": 1.0}
        }));
        assert!(PayloadDraft::from_step(&step).is_none());
    }

    #[test]
    fn test_draft_requires_parameters() {
        let step = PlanStep::new("exec", "Execute", AgentKind::Executor);
        assert!(PayloadDraft::from_step(&step).is_none());
    }
}
