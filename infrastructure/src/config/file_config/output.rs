//! Output, journal and logging configuration from TOML
//! (`[output]`, `[journal]`, `[logging]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How run results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOutputFormat {
    #[default]
    Summary,
    Full,
    Json,
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    pub format: Option<FileOutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

/// `[journal]`: where executed and simulated requests are recorded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileJournalConfig {
    /// JSONL file; in-memory only when unset
    pub path: Option<PathBuf>,
}

/// `[logging]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Also write log output to this file
    pub file: Option<PathBuf>,
}
