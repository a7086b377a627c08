//! Plan domain module
//!
//! The structured plan the planner produces for a task, and the parser that
//! reads it out of model text.

pub mod entities;
pub mod parser;

pub use entities::{AgentPlan, PlanMetric, PlanRisk, PlanStep, StepParameters, StepStatus};
pub use parser::{PlanDraft, parse_plan_response};
