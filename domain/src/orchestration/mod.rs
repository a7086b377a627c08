//! Orchestration domain module
//!
//! Records the coordinator produces while driving a plan: per-step audit
//! entries and the final run result.

pub mod entities;
pub mod value_objects;

pub use entities::{CoordinatorResult, StepExecutionRecord};
pub use value_objects::{RunStatus, StepOutput};
