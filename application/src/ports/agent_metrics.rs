//! Agent metrics port
//!
//! Latency and counter sink for the role workers.

use conductor_domain::AgentKind;
use std::time::Duration;

pub trait AgentMetrics: Send + Sync {
    fn record_latency(&self, agent: AgentKind, operation: &str, elapsed: Duration);

    fn increment(&self, agent: AgentKind, metric: &str, tags: &[(&str, &str)]);
}

/// No-op metrics sink
pub struct NoMetrics;

impl AgentMetrics for NoMetrics {
    fn record_latency(&self, _agent: AgentKind, _operation: &str, _elapsed: Duration) {}
    fn increment(&self, _agent: AgentKind, _metric: &str, _tags: &[(&str, &str)]) {}
}
