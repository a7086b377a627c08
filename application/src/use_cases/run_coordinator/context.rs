//! Per-run state threaded between steps.

use super::types::CandidateSelection;
use conductor_domain::{AgentKind, AgentReport, CoderOutput, PlanStep};
use std::collections::{BTreeMap, HashMap};

/// State scoped to one run: coder outputs and the reports produced so far.
#[derive(Debug, Default)]
pub(crate) struct RunContext {
    coder_outputs: HashMap<String, CoderOutput>,
    latest_coder_output: Option<CoderOutput>,
    reports: BTreeMap<AgentKind, AgentReport>,
}

impl RunContext {
    pub(crate) fn record_coder_output(&mut self, step_id: &str, output: CoderOutput) {
        self.coder_outputs.insert(step_id.to_string(), output.clone());
        self.latest_coder_output = Some(output);
    }

    pub(crate) fn record_report(&mut self, report: AgentReport) {
        self.reports.insert(report.agent, report);
    }

    pub(crate) fn report(&self, kind: AgentKind) -> Option<&AgentReport> {
        self.reports.get(&kind)
    }

    /// Coder output a reviewer step should judge.
    pub(crate) fn candidate_for(&self, step: &PlanStep, selection: CandidateSelection) -> Option<&CoderOutput> {
        match selection {
            CandidateSelection::Latest => self.latest_coder_output.as_ref(),
            CandidateSelection::DeclaredDependency => step
                .dependencies
                .iter()
                .rev()
                .find_map(|id| self.coder_outputs.get(id))
                .or(self.latest_coder_output.as_ref()),
        }
    }
}
