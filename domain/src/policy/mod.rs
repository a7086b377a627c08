//! Risk policy domain module
//!
//! [`RiskRules`] evaluates individual rules; [`PolicyGuard`] composes them into
//! a single allow/deny decision that must be computed before any wallet call.

pub mod guard;
pub mod rules;

pub use guard::{PolicyConfig, PolicyDecision, PolicyGuard};
pub use rules::{DefaultRiskRules, ExposureLimits, RiskRuleEvaluation, RiskRules};
