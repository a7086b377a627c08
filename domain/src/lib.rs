//! Domain layer for conductor
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Pipeline
//!
//! A [`Task`] is turned into an [`AgentPlan`] by the planner. Each
//! [`PlanStep`] is dispatched, in list order, to the worker named by its
//! [`Assignee`]: coder, reviewer or executor.
//!
//! ## Routing
//!
//! Every model completion is requested for a [`RoutingPurpose`]; the purpose
//! selects an ordered provider list and, together with the input and
//! generation options, the cache key.
//!
//! ## Policy
//!
//! State-mutating requests pass through the [`PolicyGuard`] before any
//! wallet call. The guard composes slippage, allowlist and exposure rules
//! from a [`RiskRules`] implementation.

pub mod agent;
pub mod coding;
pub mod core;
pub mod orchestration;
pub mod plan;
pub mod policy;
pub mod prompt;
pub mod review;
pub mod routing;
pub mod task;
pub mod transaction;

// Re-export commonly used types
pub use agent::{
    ActionOutcome, AgentActionResult, AgentKind, AgentObservation, AgentReport, Artifacts,
    Assignee,
};
pub use coding::{CodeChange, CoderOutput, FileAction, parse_coder_response};
pub use core::{
    error::DomainError,
    parse::{ParseOutcome, parse_json_response},
    string::clip_for_log,
};
pub use orchestration::{CoordinatorResult, RunStatus, StepExecutionRecord, StepOutput};
pub use plan::{
    AgentPlan, PlanDraft, PlanMetric, PlanRisk, PlanStep, StepParameters, StepStatus,
    parse_plan_response,
};
pub use policy::{
    DefaultRiskRules, ExposureLimits, PolicyConfig, PolicyDecision, PolicyGuard,
    RiskRuleEvaluation, RiskRules,
};
pub use prompt::AgentPromptTemplate;
pub use review::{FindingKind, ReviewFinding, ReviewerOutput, parse_reviewer_response};
pub use routing::{
    CompletionOptions, CompletionResult, CompletionUsage, RouteCompletionParams, RoutingPurpose,
};
pub use task::{Priority, Severity, Task, TaskId};
pub use transaction::{
    AccountPosition, ExecutionMode, ExecutionResult, ExecutorPayload, PayloadDraft, RiskContext,
    RiskContextInput, SimulationRequest, SimulationResult,
};
