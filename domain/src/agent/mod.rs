//! Agent domain module
//!
//! Role identities, step dispatch outcomes and per-worker reports shared by
//! the planner, coder, reviewer and executor workers.

pub mod entities;
pub mod value_objects;

pub use entities::{AgentActionResult, AgentObservation, AgentReport, Artifacts};
pub use value_objects::{ActionOutcome, AgentKind, Assignee};
