//! Router telemetry sinks
//!
//! The router reports one event per provider attempt and per cache hit.
//! [`TracingTelemetry`] forwards them to `tracing` and the `metrics` facade;
//! [`RecordingTelemetry`] keeps them in memory for inspection.

use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

pub trait RouterTelemetry: Send + Sync {
    fn record_success(&self, provider: &str, purpose: &str, latency: Duration);
    fn record_failure(&self, provider: &str, purpose: &str, error: &str);
    fn record_cache_hit(&self, provider: &str, purpose: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryEvent {
    Success {
        provider: String,
        purpose: String,
        latency_ms: u64,
    },
    Failure {
        provider: String,
        purpose: String,
        error: String,
    },
    CacheHit {
        provider: String,
        purpose: String,
    },
}

pub struct TracingTelemetry;

impl RouterTelemetry for TracingTelemetry {
    fn record_success(&self, provider: &str, purpose: &str, latency: Duration) {
        debug!(
            provider,
            purpose,
            latency_ms = latency.as_millis() as u64,
            "Completion served"
        );
        metrics::counter!(
            "router_completions_total",
            "provider" => provider.to_string(),
            "purpose" => purpose.to_string(),
            "outcome" => "success"
        )
        .increment(1);
        metrics::histogram!(
            "router_completion_latency_seconds",
            "provider" => provider.to_string(),
            "purpose" => purpose.to_string()
        )
        .record(latency.as_secs_f64());
    }

    fn record_failure(&self, provider: &str, purpose: &str, error: &str) {
        debug!(provider, purpose, error, "Completion attempt failed");
        metrics::counter!(
            "router_completions_total",
            "provider" => provider.to_string(),
            "purpose" => purpose.to_string(),
            "outcome" => "failure"
        )
        .increment(1);
    }

    fn record_cache_hit(&self, provider: &str, purpose: &str) {
        metrics::counter!(
            "router_cache_hits_total",
            "provider" => provider.to_string(),
            "purpose" => purpose.to_string()
        )
        .increment(1);
    }
}

#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn push(&self, event: TelemetryEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl RouterTelemetry for RecordingTelemetry {
    fn record_success(&self, provider: &str, purpose: &str, latency: Duration) {
        self.push(TelemetryEvent::Success {
            provider: provider.to_string(),
            purpose: purpose.to_string(),
            latency_ms: latency.as_millis() as u64,
        });
    }

    fn record_failure(&self, provider: &str, purpose: &str, error: &str) {
        self.push(TelemetryEvent::Failure {
            provider: provider.to_string(),
            purpose: purpose.to_string(),
            error: error.to_string(),
        });
    }

    fn record_cache_hit(&self, provider: &str, purpose: &str) {
        self.push(TelemetryEvent::CacheHit {
            provider: provider.to_string(),
            purpose: purpose.to_string(),
        });
    }
}
