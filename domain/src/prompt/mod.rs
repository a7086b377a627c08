//! Prompt domain
//!
//! Deterministic prompts for the planner, coder and reviewer workers.

pub mod agent;

pub use agent::AgentPromptTemplate;
