//! Problems found while validating a loaded configuration

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// The value is ignored or replaced by a default
    Warning,
    /// The value would make the run misbehave
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigIssueCode {
    UnknownPurpose { purpose: String },
    EmptyProviderId { field: String },
    OutOfRange { field: String, value: String },
    UnusedField { field: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: IssueSeverity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == IssueSeverity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            IssueSeverity::Warning => "warning",
            IssueSeverity::Error => "error",
        };
        write!(f, "{}: {}", label, self.message)
    }
}
