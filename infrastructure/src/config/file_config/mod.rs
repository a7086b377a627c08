//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to application parameter
//! types at wiring time.

mod agents;
mod issues;
mod output;
mod policy;
mod providers;
mod router;

pub use agents::{FileAgentConfig, FileExecutorConfig};
pub use issues::{ConfigIssue, ConfigIssueCode, IssueSeverity};
pub use output::{FileJournalConfig, FileLoggingConfig, FileOutputConfig, FileOutputFormat};
pub use policy::FilePolicyConfig;
pub use providers::{FileAnthropicConfig, FileMockConfig, FileOpenAiConfig, FileProvidersConfig};
pub use router::FileRouterConfig;

use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub router: FileRouterConfig,
    pub planner: FileAgentConfig,
    pub coder: FileAgentConfig,
    pub reviewer: FileAgentConfig,
    pub executor: FileExecutorConfig,
    pub policy: FilePolicyConfig,
    pub providers: FileProvidersConfig,
    pub journal: FileJournalConfig,
    pub logging: FileLoggingConfig,
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.router.validate());
        issues.extend(self.planner.validate("planner", true));
        issues.extend(self.coder.validate("coder", false));
        issues.extend(self.reviewer.validate("reviewer", false));
        issues.extend(self.policy.validate());
        issues.extend(self.providers.validate());

        issues
    }
}
