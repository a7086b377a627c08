//! Agent metrics registry
//!
//! Keeps counters and latency summaries in memory, keyed by metric name plus
//! sorted labels, and forwards every sample to the `metrics` facade so an
//! installed exporter sees them too.

use conductor_application::AgentMetrics;
use conductor_domain::AgentKind;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LatencySummary {
    pub count: u64,
    pub total_ms: f64,
    pub max_ms: f64,
}

impl LatencySummary {
    pub fn mean_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ms / self.count as f64
        }
    }

    fn observe(&mut self, ms: f64) {
        self.count += 1;
        self.total_ms += ms;
        self.max_ms = self.max_ms.max(ms);
    }
}

/// Point-in-time copy of the registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub counters: BTreeMap<String, u64>,
    pub latencies: BTreeMap<String, LatencySummary>,
}

impl MetricsSnapshot {
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty() && self.latencies.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RegistryMetrics {
    inner: Mutex<MetricsSnapshot>,
}

impl RegistryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// `name{k1=v1,k2=v2}` with labels sorted by key.
    fn series_key(name: &str, labels: &[(String, String)]) -> String {
        let mut sorted = labels.to_vec();
        sorted.sort();
        let rendered = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(",");
        format!("{}{{{}}}", name, rendered)
    }
}

impl AgentMetrics for RegistryMetrics {
    fn record_latency(&self, agent: AgentKind, operation: &str, elapsed: Duration) {
        let labels = vec![
            ("agent".to_string(), agent.as_str().to_string()),
            ("operation".to_string(), operation.to_string()),
        ];
        let ms = elapsed.as_micros() as f64 / 1000.0;

        if let Ok(mut inner) = self.inner.lock() {
            inner
                .latencies
                .entry(Self::series_key("agent_latency_ms", &labels))
                .or_default()
                .observe(ms);
        }
        metrics::histogram!("agent_latency_seconds", &labels).record(elapsed.as_secs_f64());
    }

    fn increment(&self, agent: AgentKind, metric: &str, tags: &[(&str, &str)]) {
        let mut labels = vec![("agent".to_string(), agent.as_str().to_string())];
        labels.extend(tags.iter().map(|(k, v)| (k.to_string(), v.to_string())));

        if let Ok(mut inner) = self.inner.lock() {
            *inner
                .counters
                .entry(Self::series_key(metric, &labels))
                .or_insert(0) += 1;
        }

        labels.push(("metric".to_string(), metric.to_string()));
        metrics::counter!("agent_events_total", &labels).increment(1);
    }
}
