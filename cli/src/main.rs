//! CLI entrypoint for conductor
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use conductor_application::{
    AgentMetrics, AgentParams, CandidateSelection, CoderAgent, CoordinatorProgress, CoordinatorRunOptions,
    ExecutorAgent, NoProgress, PlannerAgent, ReviewerAgent, RunCoordinatorUseCase,
    TransactionJournal,
};
use conductor_domain::{
    DefaultRiskRules, ExecutorPayload, PolicyGuard, Priority, Severity, Task, TaskId,
};
use conductor_infrastructure::{
    ConfigLoader, FileConfig, FileOutputFormat, InMemoryJournal, JsonlTransactionJournal,
    ModelRouter, RegistryMetrics, SimulatedWallet, SimulatedWalletConfig,
};
use conductor_presentation::{
    Cli, Command, ConsoleFormatter, OutputConfig, OutputFormat, ProgressReporter, RunArgs,
    SimpleProgress,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        for line in ConfigLoader::describe_sources() {
            println!("{}", line);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, config.logging.file.as_deref())?;

    info!("Starting conductor");
    check_config(&config)?;

    let output = OutputConfig::resolve(
        cli.output,
        config.output.format.map(output_format),
        config.output.color,
        cli.quiet,
    );
    output.apply_color();

    let Some(command) = cli.command else {
        bail!("No command given. Try `conductor run \"<goal>\"` or `conductor --help`.");
    };

    match command {
        Command::Run(args) => {
            let services = Services::build(&config)?;
            run_task(&services, &args, &output, cli.verbose).await
        }
        Command::Providers => {
            let services = Services::build(&config)?;
            list_providers(&services).await;
            Ok(ExitCode::SUCCESS)
        }
        Command::Journal => print_journal(&config),
    }
}

/// Initialize logging: stderr always, plus a log file when configured.
fn init_logging(verbose: u8, file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Log every config issue; refuse to start on errors.
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            error!("config: {}", issue);
        } else {
            warn!("config: {}", issue);
        }
    }

    let errors = issues.iter().filter(|i| i.is_error()).count();
    if errors > 0 {
        bail!(
            "Configuration has {} error(s). Run with -v for details or fix the config file.",
            errors
        );
    }
    Ok(())
}

fn output_format(format: FileOutputFormat) -> OutputFormat {
    match format {
        FileOutputFormat::Summary => OutputFormat::Summary,
        FileOutputFormat::Full => OutputFormat::Full,
        FileOutputFormat::Json => OutputFormat::Json,
    }
}

/// Wired application services
struct Services {
    router: Arc<ModelRouter>,
    metrics: Arc<RegistryMetrics>,
    coordinator: RunCoordinatorUseCase,
}

impl Services {
    fn build(config: &FileConfig) -> Result<Self> {
        // === Dependency Injection ===
        let router = Arc::new(ModelRouter::from_config(&config.router, &config.providers));
        let registry = Arc::new(RegistryMetrics::new());
        let metrics: Arc<dyn AgentMetrics> = registry.clone();

        let journal: Arc<dyn TransactionJournal> = match &config.journal.path {
            Some(path) => Arc::new(JsonlTransactionJournal::open(path).with_context(|| {
                format!("Failed to open transaction journal {}", path.display())
            })?),
            None => Arc::new(InMemoryJournal::new()),
        };

        // The executor's mode decides between simulate and execute
        let wallet = Arc::new(SimulatedWallet::new(SimulatedWalletConfig {
            dry_run: false,
            ..SimulatedWalletConfig::default()
        }));

        let guard = PolicyGuard::new(
            Arc::new(DefaultRiskRules::new(config.policy.exposure_limits())),
            config.policy.to_policy_config(),
        );

        let planner = PlannerAgent::new(
            router.clone(),
            config.planner.apply_to(AgentParams::planner()),
            metrics.clone(),
        );
        let coder = CoderAgent::new(
            router.clone(),
            config.coder.apply_to(AgentParams::coder()),
            metrics.clone(),
        );
        let reviewer = ReviewerAgent::new(
            router.clone(),
            config.reviewer.apply_to(AgentParams::reviewer()),
            metrics.clone(),
        );
        let executor = ExecutorAgent::new(
            wallet,
            guard,
            journal,
            config.executor.to_executor_config(),
            metrics,
        );

        let coordinator = RunCoordinatorUseCase::new(
            Arc::new(planner),
            Arc::new(coder),
            Arc::new(reviewer),
            Arc::new(executor),
        );

        Ok(Self {
            router,
            metrics: registry,
            coordinator,
        })
    }

    /// Log the counters and latencies recorded by the workers so far.
    fn log_metrics(&self) {
        let snapshot = self.metrics.snapshot();
        for (series, count) in &snapshot.counters {
            debug!(series = %series, count, "Worker counter");
        }
        for (series, latency) in &snapshot.latencies {
            debug!(
                series = %series,
                count = latency.count,
                mean_ms = latency.mean_ms(),
                max_ms = latency.max_ms,
                "Worker latency"
            );
        }
    }
}

/// Build the task from `--task-file` or from the goal and flags.
///
/// Flags given alongside a task file override its fields.
fn build_task(args: &RunArgs) -> Result<Task> {
    let mut task = match &args.task_file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read task file {}", path.display()))?;
            serde_json::from_str::<Task>(&raw)
                .with_context(|| format!("Invalid task file {}", path.display()))?
        }
        None => {
            let goal = args
                .goal
                .as_deref()
                .context("A goal is required. Pass it as an argument or use --task-file.")?;
            Task::new(TaskId::generate(), goal)
        }
    };

    if let Some(id) = &args.id {
        task.id = TaskId::from(id.as_str());
    }
    if let Some(description) = &args.description {
        task = task.with_description(description);
    }
    if let Some(priority) = &args.priority {
        let priority: Priority = priority.parse().context("Invalid --priority")?;
        task = task.with_priority(priority);
    }
    if let Some(risk) = &args.risk {
        let risk: Severity = risk.parse().context("Invalid --risk")?;
        task = task.with_risk(risk);
    }
    for tag in &args.tags {
        task = task.with_tag(tag);
    }

    task.validate()?;
    Ok(task)
}

fn load_payload(path: &Path) -> Result<ExecutorPayload> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read executor payload {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid executor payload {}", path.display()))
}

fn build_options(args: &RunArgs, cancellation: CancellationToken) -> Result<CoordinatorRunOptions> {
    let mut options = CoordinatorRunOptions::default().with_cancellation(cancellation);
    if let Some(dry_run) = args.dry_run_override() {
        options = options.with_dry_run(dry_run);
    }
    if let Some(path) = &args.executor_payload {
        options = options.with_executor_payload(load_payload(path)?);
    }
    if args.follow_dependencies {
        options = options.with_candidate_selection(CandidateSelection::DeclaredDependency);
    }
    Ok(options)
}

async fn run_task(
    services: &Services,
    args: &RunArgs,
    output: &OutputConfig,
    verbose: u8,
) -> Result<ExitCode> {
    let task = build_task(args)?;

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling run");
            interrupt.cancel();
        }
    });
    let options = build_options(args, token)?;

    info!(task_id = %task.id, "Running task");

    // The spinner would fight with log lines, so verbose runs print plain progress
    let progress: Box<dyn CoordinatorProgress> = if !output.show_progress {
        Box::new(NoProgress)
    } else if verbose > 0 {
        Box::new(SimpleProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let result = match services
        .coordinator
        .run_with_progress(&task, &options, progress.as_ref())
        .await
    {
        Ok(result) => result,
        Err(e) if e.is_cancelled() => {
            eprintln!("Run cancelled.");
            return Ok(ExitCode::from(130));
        }
        Err(e) => return Err(e.into()),
    };
    services.log_metrics();

    let rendered = match output.format {
        OutputFormat::Full => ConsoleFormatter::format(&result),
        OutputFormat::Summary => ConsoleFormatter::format_summary(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };
    println!("{}", rendered);

    if result.is_completed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

async fn list_providers(services: &Services) {
    let health = services.router.healthcheck_all().await;
    if health.is_empty() {
        println!("No providers registered.");
        return;
    }
    for (id, healthy) in health {
        let status = if healthy { "ok" } else { "unavailable" };
        println!("{:<12} {}", id, status);
    }
}

fn print_journal(config: &FileConfig) -> Result<ExitCode> {
    let Some(path) = &config.journal.path else {
        println!("No journal configured. Set [journal] path in the config file.");
        return Ok(ExitCode::SUCCESS);
    };
    let journal = JsonlTransactionJournal::open(path)
        .with_context(|| format!("Failed to open transaction journal {}", path.display()))?;
    let entries = journal.list();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_domain::{AgentKind, RunStatus};
    use conductor_infrastructure::providers::mock::MOCK_COUNTERPARTY;

    fn mock_config() -> FileConfig {
        let mut config = FileConfig::default();
        config.providers.mock.latency_ms = 0;
        config.policy.allowlist = vec![MOCK_COUNTERPARTY.to_string()];
        config
    }

    fn goal_args(goal: &str) -> RunArgs {
        RunArgs {
            goal: Some(goal.to_string()),
            ..RunArgs::default()
        }
    }

    #[test]
    fn test_build_task_from_flags() {
        let args = RunArgs {
            id: Some("T-7".to_string()),
            description: Some("more detail".to_string()),
            priority: Some("high".to_string()),
            risk: Some("critical".to_string()),
            tags: vec!["infra".to_string()],
            ..goal_args("add logging")
        };

        let task = build_task(&args).unwrap();
        assert_eq!(task.id.as_str(), "T-7");
        assert_eq!(task.goal, "add logging");
        assert_eq!(task.description.as_deref(), Some("more detail"));
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.risk, Severity::Critical);
        assert_eq!(task.tags, vec!["infra"]);
    }

    #[test]
    fn test_build_task_generates_id() {
        let task = build_task(&goal_args("add logging")).unwrap();
        assert!(!task.id.as_str().is_empty());
    }

    #[test]
    fn test_build_task_requires_goal() {
        assert!(build_task(&RunArgs::default()).is_err());
        assert!(build_task(&goal_args("   ")).is_err());
    }

    #[test]
    fn test_build_task_rejects_unknown_priority() {
        let args = RunArgs {
            priority: Some("urgent-ish".to_string()),
            ..goal_args("add logging")
        };
        assert!(build_task(&args).is_err());
    }

    #[test]
    fn test_build_task_from_file_with_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("task.json");
        std::fs::write(&path, r#"{"id": "F-1", "goal": "rotate keys", "tags": ["ops"]}"#).unwrap();

        let args = RunArgs {
            task_file: Some(path),
            risk: Some("high".to_string()),
            ..RunArgs::default()
        };
        let task = build_task(&args).unwrap();
        assert_eq!(task.id.as_str(), "F-1");
        assert_eq!(task.goal, "rotate keys");
        assert_eq!(task.risk, Severity::High);
        assert_eq!(task.tags, vec!["ops"]);
    }

    #[test]
    fn test_build_options_from_flags() {
        let args = RunArgs {
            execute: true,
            follow_dependencies: true,
            ..goal_args("x")
        };
        let options = build_options(&args, CancellationToken::new()).unwrap();
        assert_eq!(options.dry_run, Some(false));
        assert!(options.cancellation.is_some());
    }

    #[test]
    fn test_load_payload_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.json");
        std::fs::write(
            &path,
            r#"{
                "request": {"from": "0xa", "to": "0xb", "data": "0x", "slippageBps": 10},
                "context": {"address": "0xa", "portfolioValueUsd": 1000, "positionSizeUsd": 10, "ltv": 0.1},
                "mode": "simulate"
            }"#,
        )
        .unwrap();

        let payload = load_payload(&path).unwrap();
        assert_eq!(payload.request.to, "0xb");
        assert!(load_payload(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_check_config_rejects_errors() {
        let mut config = FileConfig::default();
        config.router.default_temperature = Some(7.0);
        assert!(check_config(&config).is_err());
        assert!(check_config(&FileConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_mock_pipeline_completes() {
        let services = Services::build(&mock_config()).unwrap();
        let task = build_task(&goal_args("add structured logging")).unwrap();

        let result = services
            .coordinator
            .run(&task, &CoordinatorRunOptions::default())
            .await
            .unwrap();

        assert_eq!(result.status, RunStatus::Completed);
        assert_eq!(result.steps.len(), 4);
        assert_eq!(result.steps[3].assignee, AgentKind::Executor);
    }

    #[tokio::test]
    async fn test_mock_pipeline_records_worker_counters() {
        let services = Services::build(&mock_config()).unwrap();
        let task = build_task(&goal_args("add structured logging")).unwrap();
        assert!(services.metrics.snapshot().is_empty());

        services
            .coordinator
            .run(&task, &CoordinatorRunOptions::default())
            .await
            .unwrap();

        let snapshot = services.metrics.snapshot();
        assert_eq!(snapshot.counters.get("transactions_simulated{agent=executor}"), Some(&1));
        assert_eq!(snapshot.counters.get("code_suggestions{agent=coder}"), Some(&1));
        assert!(!snapshot.counters.contains_key("policy_rejections{agent=executor}"));
        assert!(snapshot.latencies.keys().any(|k| k.contains("agent=executor")));
    }

    #[tokio::test]
    async fn test_mock_pipeline_denied_without_allowlist() {
        let mut config = mock_config();
        config.policy.allowlist.clear();
        let services = Services::build(&config).unwrap();
        let task = build_task(&goal_args("add structured logging")).unwrap();

        let result = services
            .coordinator
            .run(&task, &CoordinatorRunOptions::default())
            .await
            .unwrap();

        assert_eq!(result.status, RunStatus::Failed);
        assert!(!result.steps.last().unwrap().is_success());
    }

    #[tokio::test]
    async fn test_executions_land_in_jsonl_journal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let mut config = mock_config();
        config.journal.path = Some(path.clone());

        let services = Services::build(&config).unwrap();
        let task = build_task(&goal_args("add structured logging")).unwrap();
        services
            .coordinator
            .run(&task, &CoordinatorRunOptions::default())
            .await
            .unwrap();
        drop(services);

        let journal = JsonlTransactionJournal::open(&path).unwrap();
        assert_eq!(journal.list().len(), 1);
    }

    #[tokio::test]
    async fn test_providers_include_mock() {
        let services = Services::build(&mock_config()).unwrap();
        assert_eq!(services.router.provider_ids(), vec!["mock"]);
    }
}
