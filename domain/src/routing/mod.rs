//! Completion routing domain module
//!
//! Purposes, request/response records and the cache key shared by the
//! router and every completion provider.

pub mod purpose;
pub mod types;

pub use purpose::RoutingPurpose;
pub use types::{CompletionOptions, CompletionResult, CompletionUsage, RouteCompletionParams};
