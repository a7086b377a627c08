//! Review verdicts produced by the reviewer worker.

use crate::core::parse::{ParseOutcome, parse_json_response};
use serde::{Deserialize, Serialize};

/// How serious a review finding is. Only `Blocking` findings are issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    Blocking,
    Warning,
    Info,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::Blocking => "blocking",
            FindingKind::Warning => "warning",
            FindingKind::Info => "info",
        }
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewFinding {
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ReviewFinding {
    pub fn blocking(message: impl Into<String>) -> Self {
        Self {
            kind: FindingKind::Blocking,
            message: message.into(),
            path: None,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.kind == FindingKind::Blocking
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerOutput {
    pub approved: bool,
    #[serde(default)]
    pub findings: Vec<ReviewFinding>,
    #[serde(default)]
    pub tests_required: Vec<String>,
}

impl ReviewerOutput {
    /// Unapproved verdict returned when the model response could not be read.
    pub fn invalid_response() -> Self {
        Self {
            approved: false,
            findings: vec![ReviewFinding::blocking(
                "Model returned an invalid response. Retry or review manually.",
            )],
            tests_required: Vec::new(),
        }
    }

    pub fn blocking_messages(&self) -> Vec<String> {
        self.findings
            .iter()
            .filter(|f| f.is_blocking())
            .map(|f| f.message.clone())
            .collect()
    }
}

/// Parse a reviewer response.
pub fn parse_reviewer_response(response: &str) -> ParseOutcome<ReviewerOutput> {
    parse_json_response(response)
}
