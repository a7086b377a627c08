//! Agent domain entities

use super::value_objects::{ActionOutcome, AgentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque key/value payload attached to an action result.
pub type Artifacts = serde_json::Map<String, serde_json::Value>;

/// Outcome of dispatching one plan step to a worker.
///
/// `O` is the role-specific payload (coder diff, review verdict, wallet result).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentActionResult<O> {
    pub step_id: String,
    pub outcome: ActionOutcome,
    pub message: String,
    #[serde(default)]
    pub artifacts: Artifacts,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    #[serde(default)]
    pub retries: u32,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub output: Option<O>,
}

impl<O> AgentActionResult<O> {
    /// A successful result with no payload, started and finished now.
    pub fn success(step_id: impl Into<String>, message: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            step_id: step_id.into(),
            outcome: ActionOutcome::Success,
            message: message.into(),
            artifacts: Artifacts::new(),
            started_at: now,
            finished_at: now,
            retries: 0,
            output: None,
        }
    }

    /// A failed result with no payload, started and finished now.
    pub fn failed(step_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            outcome: ActionOutcome::Failed,
            ..Self::success(step_id, message)
        }
    }

    pub fn with_output(mut self, output: O) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_artifact(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.artifacts.insert(key.into(), value.into());
        self
    }

    pub fn with_timing(mut self, started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> Self {
        self.started_at = started_at;
        self.finished_at = finished_at;
        self
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Convert the payload type, keeping every other field.
    pub fn map_output<U>(self, f: impl FnOnce(O) -> U) -> AgentActionResult<U> {
        AgentActionResult {
            step_id: self.step_id,
            outcome: self.outcome,
            message: self.message,
            artifacts: self.artifacts,
            started_at: self.started_at,
            finished_at: self.finished_at,
            retries: self.retries,
            output: self.output.map(f),
        }
    }
}

/// Cumulative summary a worker produces after each invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReport {
    pub agent: AgentKind,
    #[serde(default)]
    pub summaries: Vec<String>,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub stats: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl AgentReport {
    /// The report a worker exposes before it has been invoked.
    pub fn empty(agent: AgentKind) -> Self {
        Self {
            agent,
            summaries: Vec::new(),
            issues: Vec::new(),
            stats: BTreeMap::new(),
            metadata: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summaries.push(summary.into());
        self
    }

    pub fn with_issue(mut self, issue: impl Into<String>) -> Self {
        self.issues.push(issue.into());
        self
    }

    pub fn with_stat(mut self, name: impl Into<String>, value: f64) -> Self {
        self.stats.insert(name.into(), value);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata
            .get_or_insert_with(serde_json::Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty() && self.issues.is_empty() && self.stats.is_empty()
    }
}

/// Something a worker is told about; only logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentObservation {
    pub source: String,
    pub message: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl AgentObservation {
    pub fn new(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            data: serde_json::Value::Null,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_result_defaults() {
        let result: AgentActionResult<()> = AgentActionResult::failed("s-1", "boom");
        assert_eq!(result.outcome, ActionOutcome::Failed);
        assert_eq!(result.retries, 0);
        assert!(result.output.is_none());
        assert!(result.artifacts.is_empty());
    }

    #[test]
    fn test_map_output_keeps_fields() {
        let result = AgentActionResult::success("s-2", "ok")
            .with_artifact("provider", "mock")
            .with_output(3_u32);
        let mapped = result.map_output(|n| n.to_string());
        assert_eq!(mapped.output.as_deref(), Some("3"));
        assert_eq!(mapped.artifacts["provider"], "mock");
        assert_eq!(mapped.step_id, "s-2");
    }

    #[test]
    fn test_report_builder() {
        let report = AgentReport::empty(AgentKind::Coder)
            .with_summary("done")
            .with_stat("files", 2.0)
            .with_metadata("provider", "mock");
        assert!(!report.is_empty());
        assert_eq!(report.stats["files"], 2.0);
        assert_eq!(report.metadata.unwrap()["provider"], "mock");
    }

    #[test]
    fn test_empty_report() {
        assert!(AgentReport::empty(AgentKind::Executor).is_empty());
    }
}
