//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for run results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plan, every step record and every worker report
    Full,
    /// Status line plus one line per step
    Summary,
    /// The coordinator result as JSON
    Json,
}

/// CLI arguments for conductor
#[derive(Parser, Debug)]
#[command(name = "conductor")]
#[command(author, version, about = "Plan, code, review and execute a task with role-based workers")]
#[command(long_about = r#"
Conductor turns a task into a plan and dispatches each step to a worker:
the coder proposes changes, the reviewer gates them, and the executor
simulates or submits a transaction after the policy guard allows it.

Configuration files are loaded from (in priority order):
1. --config <path>          Explicit config file
2. ./conductor.toml         Project-level config
3. ~/.config/conductor/config.toml   Global config

Example:
  conductor run "Add structured logging to the executor"
  conductor run --task-file task.json --executor-payload payload.json --execute
  conductor providers
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plan and run a task
    Run(RunArgs),
    /// List registered completion providers and their health
    Providers,
    /// Print the transaction journal
    Journal,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// What the task should achieve (required unless --task-file is given)
    pub goal: Option<String>,

    /// Read the whole task from a JSON file
    #[arg(long, value_name = "FILE", conflicts_with = "goal")]
    pub task_file: Option<PathBuf>,

    /// Task id (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// Free-form elaboration of the goal
    #[arg(long)]
    pub description: Option<String>,

    /// Task priority: low, medium, high
    #[arg(long)]
    pub priority: Option<String>,

    /// Declared risk: low, medium, high, critical
    #[arg(long)]
    pub risk: Option<String>,

    /// Tag the task (can be specified multiple times)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Force simulation for executor steps
    #[arg(long, conflicts_with = "execute")]
    pub dry_run: bool,

    /// Submit executor steps instead of simulating them
    #[arg(long)]
    pub execute: bool,

    /// Executor payload (request, context, mode) as a JSON file
    #[arg(long, value_name = "FILE")]
    pub executor_payload: Option<PathBuf>,

    /// Review the coder output of the step's declared dependency
    /// instead of the most recent one
    #[arg(long)]
    pub follow_dependencies: bool,
}

impl RunArgs {
    /// Caller's dry-run choice; `None` leaves it to the step and config.
    pub fn dry_run_override(&self) -> Option<bool> {
        if self.execute {
            Some(false)
        } else if self.dry_run {
            Some(true)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_flags() {
        let cli = Cli::parse_from([
            "conductor",
            "run",
            "add logging",
            "--priority",
            "high",
            "--tag",
            "obs",
            "--tag",
            "infra",
            "--execute",
            "-o",
            "json",
        ]);

        let Some(Command::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.goal.as_deref(), Some("add logging"));
        assert_eq!(args.priority.as_deref(), Some("high"));
        assert_eq!(args.tags, vec!["obs", "infra"]);
        assert_eq!(args.dry_run_override(), Some(false));
        assert_eq!(cli.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_dry_run_and_execute_conflict() {
        let result = Cli::try_parse_from(["conductor", "run", "g", "--dry-run", "--execute"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_dry_run_override_defaults_to_none() {
        assert_eq!(RunArgs::default().dry_run_override(), None);
        let args = RunArgs {
            dry_run: true,
            ..Default::default()
        };
        assert_eq!(args.dry_run_override(), Some(true));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["conductor", "providers", "-vv", "--no-config"]);
        assert!(matches!(cli.command, Some(Command::Providers)));
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_config);
    }
}
