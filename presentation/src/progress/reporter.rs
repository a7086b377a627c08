//! Progress reporting for coordinator runs

use colored::Colorize;
use conductor_application::CoordinatorProgress;
use conductor_domain::{AgentPlan, CoordinatorResult, PlanStep, StepExecutionRecord};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with a spinner while planning and a bar over the steps
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    /// Starts the planning spinner immediately.
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.set_prefix("Planning");
        spinner.set_message("waiting for the planner...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        Self {
            bar: Mutex::new(Some(spinner)),
        }
    }

    fn steps_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinatorProgress for ProgressReporter {
    fn on_plan_ready(&self, plan: &AgentPlan) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        if let Some(spinner) = guard.take() {
            spinner.finish_and_clear();
        }

        let bar = ProgressBar::new(plan.steps.len() as u64);
        bar.set_style(Self::steps_style());
        bar.set_prefix("Steps");
        bar.set_message(format!("plan {} ready", plan.plan_id));
        *guard = Some(bar);
    }

    fn on_step_start(&self, step: &PlanStep, _index: usize, _total: usize) {
        self.with_bar(|bar| bar.set_message(format!("{} ({})", step.title, step.assignee)));
    }

    fn on_step_complete(&self, record: &StepExecutionRecord) {
        self.with_bar(|bar| {
            let status = if record.is_success() {
                format!("{} {}", "v".green(), record.step_id())
            } else {
                format!("{} {}", "x".red(), record.step_id())
            };
            bar.set_message(status);
            bar.inc(1);
        });
    }

    fn on_run_complete(&self, result: &CoordinatorResult) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        if let Some(bar) = guard.take() {
            let message = if result.is_completed() {
                "run completed".green().to_string()
            } else {
                "run failed".red().to_string()
            };
            bar.finish_with_message(message);
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl CoordinatorProgress for SimpleProgress {
    fn on_plan_ready(&self, plan: &AgentPlan) {
        println!(
            "{} {} ({} steps)",
            "->".cyan(),
            "Plan ready".bold(),
            plan.steps.len()
        );
    }

    fn on_step_start(&self, step: &PlanStep, index: usize, total: usize) {
        println!("  [{}/{}] {} ({})", index + 1, total, step.title, step.assignee);
    }

    fn on_step_complete(&self, record: &StepExecutionRecord) {
        if record.is_success() {
            println!("    {} {}", "v".green(), record.result.message);
        } else {
            println!("    {} {} (failed)", "x".red(), record.result.message);
        }
    }

    fn on_run_complete(&self, result: &CoordinatorResult) {
        println!("{} {}\n", "->".cyan(), result.status);
    }
}
