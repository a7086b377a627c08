//! Task domain module
//!
//! The caller's high-level request and the ranking scales attached to it.

pub mod entities;
pub mod value_objects;

pub use entities::Task;
pub use value_objects::{Priority, Severity, TaskId};
