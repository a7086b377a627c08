//! Console output formatter for coordinator results

use colored::Colorize;
use conductor_domain::{
    AgentReport, CoordinatorResult, PlanStep, StepExecutionRecord, StepOutput,
};

/// Formats coordinator results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete run: plan, step records and worker reports
    pub fn format(result: &CoordinatorResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Conductor Run"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Task:".cyan().bold(),
            result.plan.task.goal
        ));
        output.push_str(&format!(
            "{} {} ({})\n",
            "Plan:".cyan().bold(),
            result.plan.plan_id,
            result.plan.model
        ));
        output.push_str(&format!("{} {}\n", "Status:".cyan().bold(), Self::status(result)));

        output.push_str(&Self::section_header("Plan"));
        for (index, step) in result.plan.steps.iter().enumerate() {
            output.push_str(&Self::plan_step_line(index, step));
        }
        if !result.plan.risks.is_empty() {
            output.push_str(&format!("\n{}\n", "Risks:".yellow().bold()));
            for risk in &result.plan.risks {
                output.push_str(&format!(
                    "  * [{}] {} (mitigation: {})\n",
                    risk.severity, risk.description, risk.mitigation
                ));
            }
        }

        output.push_str(&Self::section_header("Steps"));
        if result.steps.is_empty() {
            output.push_str(&format!("{}\n", "No steps were dispatched.".dimmed()));
        }
        for record in &result.steps {
            output.push_str(&Self::record_block(record));
        }

        output.push_str(&Self::section_header("Reports"));
        for report in &result.reports {
            output.push_str(&Self::report_block(report));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Status line plus one line per dispatched step
    pub fn format_summary(result: &CoordinatorResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Conductor Result ===".cyan().bold()
        ));
        output.push_str(&format!("{} {}\n", "Task:".bold(), result.plan.task.goal));
        output.push_str(&format!("{} {}\n\n", "Status:".bold(), Self::status(result)));

        for record in &result.steps {
            let title = result
                .plan
                .step(record.step_id())
                .map(|s| s.title.as_str())
                .unwrap_or_else(|| record.step_id());
            output.push_str(&format!(
                "  {} {} {} {}\n",
                Self::mark(record.is_success()),
                format!("[{}]", record.assignee).dimmed(),
                title,
                format!("- {}", record.result.message).dimmed()
            ));
        }

        let skipped = result.plan.steps.len().saturating_sub(result.steps.len());
        if skipped > 0 {
            output.push_str(&format!(
                "\n{}\n",
                format!("{} step(s) not reached", skipped).yellow()
            ));
        }

        output
    }

    /// Format as JSON
    pub fn format_json(result: &CoordinatorResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    fn status(result: &CoordinatorResult) -> String {
        if result.is_completed() {
            result.status.as_str().green().bold().to_string()
        } else {
            result.status.as_str().red().bold().to_string()
        }
    }

    fn mark(success: bool) -> String {
        if success {
            "v".green().to_string()
        } else {
            "x".red().to_string()
        }
    }

    fn plan_step_line(index: usize, step: &PlanStep) -> String {
        let mut line = format!(
            "  {}. {} {}\n",
            index + 1,
            step.title.bold(),
            format!("({}, {})", step.assignee, step.id).dimmed()
        );
        if !step.description.is_empty() {
            line.push_str(&format!("     {}\n", step.description));
        }
        if !step.dependencies.is_empty() {
            line.push_str(&format!(
                "     {} {}\n",
                "depends on:".dimmed(),
                step.dependencies.join(", ")
            ));
        }
        line
    }

    fn record_block(record: &StepExecutionRecord) -> String {
        let mut block = format!(
            "\n{} {}\n  {}\n",
            Self::mark(record.is_success()),
            format!("── {} ({}) ──", record.step_id(), record.assignee)
                .yellow()
                .bold(),
            record.result.message
        );

        match record.output() {
            Some(StepOutput::Coder(coder)) => {
                block.push_str(&format!("  {}\n", coder.summary));
                for file in &coder.files {
                    block.push_str(&format!("    {} {}\n", file.action, file.path));
                }
                if !coder.tests.is_empty() {
                    block.push_str(&format!("  {} {}\n", "tests:".dimmed(), coder.tests.join(", ")));
                }
            }
            Some(StepOutput::Reviewer(review)) => {
                let verdict = if review.approved {
                    "approved".green().to_string()
                } else {
                    "changes requested".red().to_string()
                };
                block.push_str(&format!("  {}\n", verdict));
                for finding in &review.findings {
                    block.push_str(&format!("    [{}] {}\n", finding.kind, finding.message));
                }
            }
            Some(StepOutput::Executor(execution)) => {
                block.push_str(&format!("  gas used: {}\n", execution.gas_used));
                if let Some(hash) = &execution.transaction_hash {
                    block.push_str(&format!("  tx: {}\n", hash));
                }
                for warning in &execution.warnings {
                    block.push_str(&format!("  {} {}\n", "!".yellow(), warning));
                }
            }
            None => {}
        }

        block
    }

    fn report_block(report: &AgentReport) -> String {
        let mut block = format!("\n{}\n", report.agent.display_name().cyan().bold());
        if report.is_empty() {
            block.push_str(&format!("  {}\n", "(no activity)".dimmed()));
            return block;
        }
        for summary in &report.summaries {
            block.push_str(&format!("  * {}\n", summary));
        }
        for issue in &report.issues {
            block.push_str(&format!("  {} {}\n", "!".red(), issue));
        }
        if !report.stats.is_empty() {
            let stats = report
                .stats
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(" ");
            block.push_str(&format!("  {}\n", stats.dimmed()));
        }
        block
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_domain::{
        AgentActionResult, AgentKind, AgentPlan, CoderOutput, PlanDraft, RunStatus, Task,
    };

    fn result() -> CoordinatorResult {
        colored::control::set_override(false);
        let task = Task::new("t-1", "add logging");
        let plan: AgentPlan = PlanDraft::fallback(&task).into_plan(task, "mock");
        let step_id = plan.steps[0].id.clone();
        let coder = CoderOutput::manual_intervention();
        let record = StepExecutionRecord::new(
            AgentKind::Coder,
            AgentActionResult::success(step_id, "Code suggestions generated")
                .with_output(StepOutput::Coder(coder)),
        );
        CoordinatorResult::new(
            plan,
            vec![record],
            vec![
                AgentReport::empty(AgentKind::Planner).with_summary("Plan generated with 1 steps"),
                AgentReport::empty(AgentKind::Coder),
            ],
        )
    }

    #[test]
    fn test_format_full_includes_sections() {
        let output = ConsoleFormatter::format(&result());
        assert!(output.contains("Conductor Run"));
        assert!(output.contains("add logging"));
        assert!(output.contains("Clarify task context"));
        assert!(output.contains("Code suggestions generated"));
        assert!(output.contains("PlannerAgent"));
        assert!(output.contains("(no activity)"));
    }

    #[test]
    fn test_format_summary_lists_steps() {
        let output = ConsoleFormatter::format_summary(&result());
        assert!(output.contains("completed"));
        assert!(output.contains("Clarify task context"));
        assert!(!output.contains("not reached"));
    }

    #[test]
    fn test_format_json_round_trips_status() {
        let json = ConsoleFormatter::format_json(&result().with_status(RunStatus::Failed));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["steps"][0]["assignee"], "coder");
    }
}
