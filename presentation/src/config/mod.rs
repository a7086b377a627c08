//! Presentation-level configuration
//!
//! Output settings after CLI flags have been layered over the config file.

use crate::cli::commands::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress indicators
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Summary,
            color: true,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    /// Flags win over file settings; JSON output never shows progress.
    pub fn resolve(
        cli_format: Option<OutputFormat>,
        file_format: Option<OutputFormat>,
        color: bool,
        quiet: bool,
    ) -> Self {
        let format = cli_format.or(file_format).unwrap_or(OutputFormat::Summary);
        Self {
            format,
            color,
            show_progress: !quiet && format != OutputFormat::Json,
        }
    }

    /// Apply the color setting process-wide.
    pub fn apply_color(&self) {
        if !self.color {
            colored::control::set_override(false);
        }
    }
}
