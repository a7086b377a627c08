//! Code-change proposals produced by the coder worker.

use crate::core::parse::{ParseOutcome, parse_json_response};
use serde::{Deserialize, Serialize};

/// What a proposed change does to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    Create,
    Update,
    Delete,
}

impl FileAction {
    pub fn as_str(&self) -> &str {
        match self {
            FileAction::Create => "create",
            FileAction::Update => "update",
            FileAction::Delete => "delete",
        }
    }
}

impl std::fmt::Display for FileAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One proposed file change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeChange {
    pub path: String,
    pub action: FileAction,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub content: String,
}

/// The coder's payload: file changes, tests to add, and a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoderOutput {
    pub files: Vec<CodeChange>,
    #[serde(default)]
    pub tests: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

impl CoderOutput {
    pub const MANUAL_INTERVENTION: &'static str =
        "Router returned invalid JSON. Manual intervention required.";

    /// Empty diff returned when the model response could not be read.
    pub fn manual_intervention() -> Self {
        Self {
            files: Vec::new(),
            tests: Vec::new(),
            summary: Self::MANUAL_INTERVENTION.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Parse a coder response.
pub fn parse_coder_response(response: &str) -> ParseOutcome<CoderOutput> {
    parse_json_response(response)
}
