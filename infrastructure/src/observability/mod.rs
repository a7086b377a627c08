//! Metrics sinks for the role workers

mod registry;

pub use registry::{LatencySummary, MetricsSnapshot, RegistryMetrics};
