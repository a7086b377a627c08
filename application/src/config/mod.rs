//! Application-level configuration.
//!
//! This module provides configuration types that control how the role
//! workers behave:
//!
//! - [`AgentParams`] - completion options for planner, coder and reviewer
//! - [`ExecutorConfig`] - executor defaults (dry-run)
//! - [`PolicyConfig`] - policy guard limits (re-exported from the domain)

pub mod agent_params;

pub use agent_params::{AgentParams, ExecutorConfig};
pub use conductor_domain::PolicyConfig;
