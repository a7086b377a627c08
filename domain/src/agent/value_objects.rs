//! Agent value objects - role identities and dispatch outcomes.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The four worker roles of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Planner,
    Coder,
    Reviewer,
    Executor,
}

impl AgentKind {
    /// Report order used by the coordinator.
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Planner,
        AgentKind::Coder,
        AgentKind::Reviewer,
        AgentKind::Executor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Planner => "planner",
            AgentKind::Coder => "coder",
            AgentKind::Reviewer => "reviewer",
            AgentKind::Executor => "executor",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AgentKind::Planner => "PlannerAgent",
            AgentKind::Coder => "CoderAgent",
            AgentKind::Reviewer => "ReviewerAgent",
            AgentKind::Executor => "ExecutorAgent",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planner" => Ok(AgentKind::Planner),
            "coder" => Ok(AgentKind::Coder),
            "reviewer" => Ok(AgentKind::Reviewer),
            "executor" => Ok(AgentKind::Executor),
            other => Err(DomainError::UnknownAgentKind(other.to_string())),
        }
    }
}

/// The role a plan step is addressed to.
///
/// Planner output is untrusted, so an assignee outside the four known roles
/// is kept verbatim instead of failing the parse; the coordinator rejects it
/// when the step is reached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Assignee {
    Agent(AgentKind),
    Unsupported(String),
}

impl Assignee {
    pub fn kind(&self) -> Option<AgentKind> {
        match self {
            Assignee::Agent(kind) => Some(*kind),
            Assignee::Unsupported(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Assignee::Agent(kind) => kind.as_str(),
            Assignee::Unsupported(raw) => raw,
        }
    }
}

impl From<AgentKind> for Assignee {
    fn from(kind: AgentKind) -> Self {
        Assignee::Agent(kind)
    }
}

impl From<String> for Assignee {
    fn from(raw: String) -> Self {
        match raw.parse::<AgentKind>() {
            Ok(kind) => Assignee::Agent(kind),
            Err(_) => Assignee::Unsupported(raw),
        }
    }
}

impl From<Assignee> for String {
    fn from(assignee: Assignee) -> Self {
        assignee.as_str().to_string()
    }
}

impl std::fmt::Display for Assignee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one step dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionOutcome {
    Success,
    Failed,
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ActionOutcome::Success => "success",
            ActionOutcome::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_kind_parse() {
        assert_eq!("Coder".parse::<AgentKind>().unwrap(), AgentKind::Coder);
        assert!("deployer".parse::<AgentKind>().is_err());
    }

    #[test]
    fn test_assignee_keeps_unknown_role() {
        let assignee: Assignee = serde_json::from_str(r#""deployer""#).unwrap();
        assert_eq!(assignee, Assignee::Unsupported("deployer".to_string()));
        assert!(assignee.kind().is_none());
    }

    #[test]
    fn test_assignee_serializes_as_string() {
        let assignee = Assignee::from(AgentKind::Reviewer);
        assert_eq!(serde_json::to_string(&assignee).unwrap(), r#""reviewer""#);
    }
}
